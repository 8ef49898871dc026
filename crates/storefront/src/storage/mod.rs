//! Local persistence substrate.
//!
//! # Model
//!
//! A synchronous, string-keyed key-value store scoped to one origin. Values
//! are JSON documents. There are no transactions: every write is a single
//! read-modify-write cycle that is visible immediately.
//!
//! ## Keys
//!
//! - `users` - every registered account, including its plaintext password
//! - `currentUser` - the session pointer (public user fields only)
//! - `purchases` - the global, append-only purchase log for all users
//!
//! ## Backends
//!
//! - [`MemoryStore`] - process-lifetime storage for tests and throwaway runs
//! - [`FileStore`] - one `<key>.json` file per key inside a data directory
//!
//! # Repositories
//!
//! Typed access goes through the repositories in [`users`], [`session`] and
//! [`purchases`]; nothing else reads or writes the raw keys.

mod file;
mod memory;
pub mod purchases;
pub mod session;
pub mod users;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys owned by the auth/purchase store.
pub mod keys {
    /// Registered accounts (with passwords).
    pub const USERS: &str = "users";

    /// The persisted session pointer.
    pub const CURRENT_USER: &str = "currentUser";

    /// Global purchase log.
    pub const PURCHASES: &str = "purchases";
}

/// Errors raised by the persistence substrate and its repositories.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be read or written.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value is not valid JSON for its expected shape.
    #[error("data corruption under key '{key}': {source}")]
    DataCorruption {
        /// The key holding the malformed value.
        key: String,
        /// The underlying parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        /// The key being written.
        key: String,
        /// The underlying encoding failure.
        #[source]
        source: serde_json::Error,
    },

    /// The key contains characters the backend cannot store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Constraint violation (e.g., duplicate email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// A synchronous string-keyed key-value store.
///
/// Implementations must make a successful `set` visible to every later
/// `get` on the same store, and durable backends must survive a reopen.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Read and decode the JSON value stored under `key`.
///
/// # Errors
///
/// Returns `StorageError::DataCorruption` if the stored value does not parse
/// as `T`, or the backend's error if it cannot be read.
pub fn load_json<S, T>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::DataCorruption {
            key: key.to_owned(),
            source,
        })
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError::Encode` if the value cannot be serialized, or the
/// backend's error if it cannot be written.
pub fn save_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, &raw)
}
