//! Purchase log repository over the `purchases` key.

use softbenny_core::{PurchaseId, UserId};

use super::{KeyValueStore, StorageError, keys, load_json, save_json};
use crate::models::purchase::Purchase;

/// Repository for the global, append-only purchase log.
pub struct PurchaseRepository<'a, S: ?Sized> {
    store: &'a mut S,
}

impl<'a, S: KeyValueStore + ?Sized> PurchaseRepository<'a, S> {
    /// Create a new purchase repository.
    pub const fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Every recorded purchase, across all users, in recording order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DataCorruption` if the stored log is malformed.
    pub fn all(&self) -> Result<Vec<Purchase>, StorageError> {
        Ok(load_json(&*self.store, keys::PURCHASES)?.unwrap_or_default())
    }

    /// The purchases recorded for `user_id`, in recording order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    pub fn for_user(&self, user_id: UserId) -> Result<Vec<Purchase>, StorageError> {
        let mut purchases = self.all()?;
        purchases.retain(|purchase| purchase.user_id == user_id);
        Ok(purchases)
    }

    /// Get one purchase by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read.
    pub fn get(&self, id: PurchaseId) -> Result<Option<Purchase>, StorageError> {
        Ok(self.all()?.into_iter().find(|purchase| purchase.id == id))
    }

    /// Append `purchase` to the log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be read or written.
    pub fn append(&mut self, purchase: &Purchase) -> Result<(), StorageError> {
        let mut purchases = self.all()?;
        purchases.push(purchase.clone());
        save_json(&mut *self.store, keys::PURCHASES, &purchases)
    }
}
