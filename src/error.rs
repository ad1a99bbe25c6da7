//! Error types for storage and network access.
//!
//! Storage failures are represented by [`StoreError`], network failures by
//! [`FetchError`] and rejected training hand-offs by [`TrainError`]. None of
//! them is fatal: the collection layer degrades on `StoreError`, and callers
//! decide how to display the others.

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](crate::storage::KeyValueStore)
/// or by the JSON layer on top of it.
///
/// # Examples
///
/// ```rust
/// use digivault::StoreError;
///
/// let err = StoreError::Quota { key: "dc_items_v1".into(), limit: 1024 };
/// assert!(err.to_string().contains("dc_items_v1"));
/// ```
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded as JSON.
    #[error("Storage value is not valid JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the key would exceed the configured storage quota.
    #[error("Storage quota of {limit} bytes exceeded while writing {key}")]
    Quota { key: String, limit: usize },

    /// The store has been switched off (e.g. disabled by the host).
    #[error("Storage is unavailable")]
    Unavailable,
}

/// Errors raised while fetching the creature list.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("Request to creature API failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Creature API returned status {0}")]
    Status(u16),

    /// The response body was not a creature list.
    #[error("Creature API returned an unreadable body: {0}")]
    Decode(#[from] serde_json::Error),

    /// An offline creature file could not be read.
    #[error("Could not read creature file: {0}")]
    File(#[from] std::io::Error),
}

/// Reasons a selection cannot be sent to training.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainError {
    /// Training needs exactly one selected creature.
    #[error("Select exactly one Digimon to train (selected: {0})")]
    NeedsSingleSelection(usize),

    /// Only "In Training" creatures can be trained.
    #[error("Only \"In Training\" Digimon can be trained; {name} is {level}")]
    NotTrainable { name: String, level: String },
}
