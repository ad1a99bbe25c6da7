//! Persistent key-value storage.
//!
//! Storage follows the browser `localStorage` model: string keys mapped to
//! raw string values, each written independently. [`KeyValueStore`] is the
//! seam; [`MemoryStore`] and [`FileStore`] are the two backends. The JSON
//! helpers at the bottom are what the stat and collection stores use.

use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Storage keys. Everything is namespaced and versioned with `_v1`.
pub mod keys {
    /// Stats map written by the collection store.
    pub const STATS: &str = "dc_digimon_stats_v1";
    /// Owned creature list.
    pub const OWNED: &str = "dc_owned_digimons_v1";
    /// Coin balance.
    pub const COINS: &str = "dc_coins_v1";
    /// Inventory list.
    pub const ITEMS: &str = "dc_items_v1";
    /// Battle team slot.
    pub const BATTLE: &str = "dc_battle_team_v1";
    /// Stats map written by the gallery-only page. Independent of [`STATS`].
    pub const LEGACY_STATS: &str = "digimon_stats_v1";
}

/// A synchronous string key-value store.
///
/// Every call stands alone: there is no batching and no transaction
/// spanning two keys.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the raw value stored under `key`.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Reject a write that would push the total stored bytes over `limit`.
fn check_quota<'a>(
    values: impl Iterator<Item = (&'a String, &'a String)>,
    key: &str,
    value: &str,
    limit: Option<usize>,
) -> Result<(), StoreError> {
    let Some(limit) = limit else {
        return Ok(());
    };
    let others: usize = values
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum();
    if others + key.len() + value.len() > limit {
        return Err(StoreError::Quota {
            key: key.to_string(),
            limit,
        });
    }
    Ok(())
}

/// Process-lifetime store backed by a `HashMap`.
///
/// Supports an optional byte quota and can be switched off entirely, which
/// makes every call fail with [`StoreError::Unavailable`].
///
/// # Examples
///
/// ```rust
/// use digivault::storage::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.set("k", "v".to_string()).unwrap();
/// assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    quota: Option<usize>,
    unavailable: bool,
}

impl MemoryStore {
    /// Create an empty, unlimited store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes beyond `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            quota: Some(limit),
            ..Self::default()
        }
    }

    /// Switch the store on or off.
    pub fn set_available(&mut self, available: bool) {
        self.unavailable = !available;
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        check_quota(self.values.iter(), key, &value, self.quota)?;
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }
        self.values.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON document on disk.
///
/// The whole key → value map is loaded on open and rewritten on every
/// write, so each `set` is durable on return.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl FileStore {
    /// File name used inside a data directory.
    pub const FILE_NAME: &'static str = "storage.json";

    /// Open (or lazily create) the store file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened storage at {:?} with {} keys", path, values.len());
        Ok(Self {
            path,
            values,
            quota: None,
        })
    }

    /// Open `storage.json` inside `dir`, creating the directory if needed.
    pub fn open_in_dir(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Self::open(dir.join(Self::FILE_NAME))
    }

    /// Reject writes beyond `limit` bytes.
    pub fn with_quota(mut self, limit: Option<usize>) -> Self {
        self.quota = limit;
        self
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        check_quota(self.values.iter(), key, &value, self.quota)?;
        let previous = self.values.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            // Keep memory consistent with what is on disk
            match previous {
                Some(old) => self.values.insert(key.to_string(), old),
                None => self.values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Read and decode the JSON value under `key`.
///
/// A missing or empty value yields `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
        _ => Ok(None),
    }
}

/// Encode `value` as JSON and store it under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw)
}

/// Like [`read_json`], but any failure is logged and replaced by `fallback`.
pub fn read_json_or<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str, fallback: T) -> T {
    match read_json(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => fallback,
        Err(e) => {
            warn!("Failed reading storage key {}: {}", key, e);
            fallback
        }
    }
}

/// Like [`write_json`], but a failure is logged and the write dropped.
///
/// Returns whether the value was stored.
pub fn write_json_logged<T: Serialize + ?Sized>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> bool {
    match write_json(store, key, value) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed saving storage key {}: {}", key, e);
            false
        }
    }
}
