//! Durable key-value storage for the cart.
//!
//! The cart is kept under a single string key as a JSON document. Two
//! backends are provided:
//!
//! - [`MemoryStore`] - process-local, cloneable handle; used by tests and by
//!   callers that bring their own persistence
//! - [`FileStore`] - one file per key in a directory; survives restarts
//!
//! Reads and writes are synchronous. Callers treat a missing key as "nothing
//! stored yet".

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur when reading or writing the durable store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Keys must be non-empty and limited to ASCII letters, digits, `-` and `_`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded for storage.
    #[error("storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The backend's shared state was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// A string-keyed store of string values.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Check that `key` is usable by every backend (including as a file name).
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
