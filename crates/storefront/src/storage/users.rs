//! User repository over the `users` key.

use softbenny_core::{Email, UserId};

use super::{KeyValueStore, StorageError, keys, load_json, save_json};
use crate::models::user::UserRecord;

/// Repository for registered accounts.
pub struct UserRepository<'a, S: ?Sized> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore + ?Sized> UserRepository<'a, S> {
    /// Create a new user repository.
    pub const fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// All registered accounts in registration order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DataCorruption` if the stored list is malformed.
    pub fn list(&self) -> Result<Vec<UserRecord>, StorageError> {
        Ok(load_json(&*self.store, keys::USERS)?.unwrap_or_default())
    }

    /// Get an account by email.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the user list cannot be read.
    pub fn get_by_email(&self, email: &Email) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|record| &record.email == email))
    }

    /// Get the account whose email and password both match exactly.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the user list cannot be read.
    pub fn get_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|record| record.matches(email, password)))
    }

    /// Whether an account with this ID exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the user list cannot be read.
    pub fn exists(&self, id: UserId) -> Result<bool, StorageError> {
        Ok(self.list()?.iter().any(|record| record.id == id))
    }

    /// Append a new account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered;
    /// the stored list is left untouched in that case.
    pub fn create(&mut self, record: UserRecord) -> Result<(), StorageError> {
        let mut users = self.list()?;
        if users.iter().any(|existing| existing.email == record.email) {
            return Err(StorageError::Conflict("email already exists".to_owned()));
        }

        users.push(record);
        save_json(&mut *self.store, keys::USERS, &users)
    }
}
