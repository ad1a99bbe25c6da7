//! Hand-off to the training page.
//!
//! Training takes exactly one selected "In Training" creature and navigates
//! to the training page with the creature's name in the query string.

use crate::error::TrainError;
use crate::selection::Selection;
use std::fmt::Write;

/// Page that receives the training hand-off.
pub const TRAIN_PAGE: &str = "train.html";

/// Percent-encode `input` for use as a URI component.
///
/// Letters, digits and `-_.!~*'()` are kept; every other UTF-8 byte is
/// written as `%XX`.
///
/// # Examples
///
/// ```rust
/// use digivault::train::encode_uri_component;
///
/// assert_eq!(encode_uri_component("Agumon"), "Agumon");
/// assert_eq!(encode_uri_component("Agumon (X)"), "Agumon%20(X)");
/// assert_eq!(encode_uri_component("a&b=c"), "a%26b%3Dc");
/// ```
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            other => {
                let _ = write!(out, "%{:02X}", other);
            }
        }
    }
    out
}

/// Relative URL of the training page for `name`.
pub fn train_url(name: &str) -> String {
    format!("{}?name={}", TRAIN_PAGE, encode_uri_component(name))
}

/// Whether the selection can be sent to training right now.
pub fn can_train(selection: &Selection) -> bool {
    selection
        .single()
        .map(|selected| selected.level.is_trainable())
        .unwrap_or(false)
}

/// Build the training URL for the current selection.
pub fn train_selection(selection: &Selection) -> Result<String, TrainError> {
    let selected = selection
        .single()
        .ok_or(TrainError::NeedsSingleSelection(selection.len()))?;

    if !selected.level.is_trainable() {
        return Err(TrainError::NotTrainable {
            name: selected.name.clone(),
            level: selected.level.to_string(),
        });
    }

    Ok(train_url(&selected.name))
}
