//! Cart store.
//!
//! Holds the current cart for the lifetime of the process. The cart is not
//! persisted: a new process starts with an empty cart.
//!
//! Observers subscribe through [`CartStore::subscribe`] and are notified
//! whenever the contents actually change; no-op calls (removing a missing
//! line, updating a missing line) do not notify.

use tokio::sync::watch;

use softbenny_core::{Price, ProductId};

use crate::models::cart::{CartLine, CartState};
use crate::models::product::Product;

/// The in-memory shopping cart.
#[derive(Debug)]
pub struct CartStore {
    state: watch::Sender<CartState>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(CartState::default());
        Self { state }
    }

    /// Add `quantity` units of `product`.
    ///
    /// Increments the existing line for the product, or appends a new line.
    /// A quantity of 0 is treated as 1.
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) {
        let quantity = quantity.max(1);

        self.state.send_modify(|state| {
            let lines = state.lines_mut();
            if let Some(line) = lines.iter_mut().find(|line| line.id == product.id) {
                line.quantity = line.quantity.saturating_add(quantity);
            } else {
                lines.push(CartLine::new(product, quantity));
            }
            state.recompute();
        });

        tracing::debug!(product_id = %product.id, quantity, "Added to cart");
    }

    /// Remove the line for `product_id`, if present.
    pub fn remove_from_cart(&mut self, product_id: ProductId) {
        let removed = self.state.send_if_modified(|state| {
            let lines = state.lines_mut();
            let before = lines.len();
            lines.retain(|line| line.id != product_id);
            let changed = lines.len() != before;
            if changed {
                state.recompute();
            }
            changed
        });

        if removed {
            tracing::debug!(%product_id, "Removed from cart");
        }
    }

    /// Set the quantity of the line for `product_id`.
    ///
    /// A quantity of zero or less removes the line. Does nothing if the line
    /// is absent.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        let Ok(quantity) = u32::try_from(quantity.max(0)) else {
            // Larger than any representable quantity
            self.set_quantity(product_id, u32::MAX);
            return;
        };

        if quantity == 0 {
            self.remove_from_cart(product_id);
        } else {
            self.set_quantity(product_id, quantity);
        }
    }

    fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        let updated = self.state.send_if_modified(|state| {
            let Some(line) = state
                .lines_mut()
                .iter_mut()
                .find(|line| line.id == product_id)
            else {
                return false;
            };
            if line.quantity == quantity {
                return false;
            }
            line.quantity = quantity;
            state.recompute();
            true
        });

        if updated {
            tracing::debug!(%product_id, quantity, "Updated cart quantity");
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        let cleared = self.state.send_if_modified(|state| {
            if state.is_empty() {
                return false;
            }
            *state = CartState::default();
            true
        });

        if cleared {
            tracing::debug!("Cleared cart");
        }
    }

    /// Borrow the current state.
    ///
    /// Do not hold the returned guard across calls that mutate the cart.
    #[must_use]
    pub fn state(&self) -> watch::Ref<'_, CartState> {
        self.state.borrow()
    }

    /// A clone of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.borrow().item_count()
    }

    /// Cart total.
    #[must_use]
    pub fn total(&self) -> Price {
        self.state.borrow().total()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }
}
