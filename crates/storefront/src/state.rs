//! Application state: the stores, constructed once at startup.

use softbenny_core::{ProductId, PurchaseId};

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::models::purchase::Purchase;
use crate::receipt::render_receipt;
use crate::services::auth::AuthStore;
use crate::services::cart::CartStore;
use crate::services::checkout::checkout;
use crate::storage::{FileStore, KeyValueStore};

/// The storefront: catalog, cart and auth/purchase store.
///
/// Presentation code receives this by reference instead of reaching for
/// global state.
pub struct Storefront<S> {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: CartStore,
    auth: AuthStore<S>,
}

impl Storefront<FileStore> {
    /// Open the storefront with file-backed storage in `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created, the
    /// catalog cannot be loaded, or the stored session is malformed.
    pub fn open(config: StorefrontConfig) -> Result<Self> {
        let storage = FileStore::open(&config.data_dir)?;
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::bundled()?,
        };
        Self::with_storage(config, catalog, storage)
    }
}

impl<S: KeyValueStore> Storefront<S> {
    /// Build the storefront over any storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be restored.
    pub fn with_storage(config: StorefrontConfig, catalog: Catalog, storage: S) -> Result<Self> {
        let auth = AuthStore::restore(storage, config.session_policy)?;
        tracing::debug!(
            products = catalog.len(),
            authenticated = auth.state().session.is_authenticated(),
            "Storefront ready"
        );

        Ok(Self {
            config,
            catalog,
            cart: CartStore::new(),
            auth,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthStore<S> {
        &self.auth
    }

    pub const fn auth_mut(&mut self) -> &mut AuthStore<S> {
        &mut self.auth
    }

    /// Add a catalog product to the cart by ID.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is not in the catalog.
    pub fn add_product(&mut self, id: ProductId, quantity: u32) -> Result<()> {
        let product = self
            .catalog
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
        self.cart.add_to_cart(product, quantity);
        Ok(())
    }

    /// Check out the cart for the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Checkout` if nobody is logged in, the cart is empty,
    /// or the purchase cannot be recorded.
    pub fn checkout(&mut self) -> Result<Purchase> {
        Ok(checkout(&mut self.cart, &mut self.auth)?)
    }

    /// Render the receipt for one of the current user's purchases.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the purchase is not in the current
    /// session's history.
    pub fn receipt(&self, id: PurchaseId) -> Result<String> {
        let state = self.auth.state();
        let purchase = state
            .purchases
            .iter()
            .find(|purchase| purchase.id == id)
            .ok_or_else(|| AppError::NotFound(format!("purchase {id}")))?;
        Ok(render_receipt(purchase, &self.config.store_name)?)
    }

    /// Consume the storefront, returning its storage.
    pub fn into_storage(self) -> S {
        self.auth.into_storage()
    }
}
