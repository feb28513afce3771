//! Storage layer for todoapp
//!
//! All persisted state goes through [`KeyValueStore`]: string keys mapping to
//! string blobs, the same shape as browser local storage. Two backends ship
//! with the crate:
//!
//! - [`MemoryStore`]: a process-local map, used by tests and embedders
//! - [`FileStore`]: one file per key under a data directory
//!
//! # Directory Structure
//!
//! ```text
//! <data_dir>/
//!   todo.toml                   # Optional configuration
//!   store/
//!     todoapp_user.json         # Serialized signed-in user
//!     todoapp_tasks%3A1.json    # Task collection for user "1"
//!     *.json.lock               # Per-key lock files
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

/// Name of the key-value directory inside the data directory
pub const STORE_DIR: &str = "store";

/// String-keyed blob storage.
///
/// Writes replace the whole value for a key. There is no transaction and no
/// version check: the last writer wins.
pub trait KeyValueStore: Send + Sync + fmt::Debug {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Every stored key starting with `prefix`, sorted
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a value is currently stored under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Snapshot of all stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = self.keys();
        keys.retain(|key| key.starts_with(prefix));
        Ok(keys)
    }
}

/// File-backed key-value store: one JSON file per key
///
/// Each access holds the key's lock file and waits for it with a blocking
/// sleep, so a contended key stalls the calling thread (and a current-thread
/// runtime) for up to the lock timeout.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    lock_timeout_ms: u64,
}

impl FileStore {
    /// Create a store rooted at `root` (created lazily on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// Create the store for a data directory (`<data_dir>/store`)
    pub fn for_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STORE_DIR))
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        lock::read_locked_str(self.path_for(key), self.lock_timeout_ms)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock::write_atomic_locked(self.path_for(key), value.as_bytes(), self.lock_timeout_ms)
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock::remove_locked(self.path_for(key), self.lock_timeout_ms)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(Error::Io(err)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let Some(stem) = name.to_str().and_then(|name| name.strip_suffix(".json")) else {
                continue;
            };
            if let Some(key) = decode_key(stem) {
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Percent-encode anything outside `[A-Za-z0-9_-]` so any key maps to a
/// distinct, portable file name.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Inverse of [`encode_key`]; `None` for names no key encodes to
fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Outcome of reading a structured value from a [`KeyValueStore`]
#[derive(Debug)]
pub enum Decoded<T> {
    /// Nothing stored under the key
    Missing,
    /// Stored value parsed and matched the expected shape
    Valid(T),
    /// Stored value exists but is not valid UTF-8 or does not parse as `T`
    Corrupt(Error),
}

impl<T> Decoded<T> {
    /// The parsed value, discarding the missing/corrupt distinction
    pub fn valid(self) -> Option<T> {
        match self {
            Decoded::Valid(value) => Some(value),
            Decoded::Missing | Decoded::Corrupt(_) => None,
        }
    }
}

/// Read and schema-check the JSON value under `key`.
///
/// Backend failures are errors; malformed data is reported as
/// [`Decoded::Corrupt`] so callers can pick a fallback.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Decoded<T>> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Ok(Decoded::Missing),
        Err(err @ Error::InvalidUtf8(_)) => return Ok(Decoded::Corrupt(err)),
        Err(err) => return Err(err),
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Decoded::Valid(value)),
        Err(err) => Ok(Decoded::Corrupt(Error::Json(err))),
    }
}

/// Serialize `value` as JSON and store it under `key`
pub fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
