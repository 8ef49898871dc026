//! Session pointer repository over the `currentUser` key.

use super::{KeyValueStore, StorageError, keys, load_json, save_json};
use crate::models::user::User;

/// Repository for the persisted session pointer.
pub struct SessionRepository<'a, S: ?Sized> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore + ?Sized> SessionRepository<'a, S> {
    /// Create a new session repository.
    pub const fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// The stored session user, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DataCorruption` if the pointer is malformed.
    pub fn load(&self) -> Result<Option<User>, StorageError> {
        load_json(&*self.store, keys::CURRENT_USER)
    }

    /// Persist `user` as the session pointer.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub fn save(&mut self, user: &User) -> Result<(), StorageError> {
        save_json(&mut *self.store, keys::CURRENT_USER, user)
    }

    /// Remove the session pointer.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(keys::CURRENT_USER)
    }
}
