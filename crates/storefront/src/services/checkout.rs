//! Checkout: moves the cart into the purchase log.

use thiserror::Error;

use crate::error::add_breadcrumb;
use crate::models::purchase::{NewPurchase, Purchase, PurchaseItem};
use crate::storage::KeyValueStore;

use super::auth::{AuthError, AuthStore};
use super::cart::CartStore;

/// Reasons a checkout cannot complete.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nobody is logged in. The cart is left as it was.
    #[error("you must be logged in to check out")]
    NotAuthenticated,

    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// Recording the purchase failed.
    #[error("failed to record purchase: {0}")]
    Auth(#[from] AuthError),
}

/// Record the cart as a purchase for the logged-in user and empty the cart.
///
/// # Errors
///
/// Returns `CheckoutError::NotAuthenticated` or `CheckoutError::EmptyCart`
/// without touching either store. Returns `CheckoutError::Auth` if the
/// purchase log cannot be written; the cart is kept in that case.
pub fn checkout<S: KeyValueStore>(
    cart: &mut CartStore,
    auth: &mut AuthStore<S>,
) -> Result<Purchase, CheckoutError> {
    if !auth.state().session.is_authenticated() {
        tracing::warn!("Checkout rejected: not logged in");
        return Err(CheckoutError::NotAuthenticated);
    }

    let new = {
        let state = cart.state();
        if state.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        NewPurchase {
            items: state.lines().iter().map(PurchaseItem::from).collect(),
            total: state.total(),
        }
    };

    let purchase = auth
        .add_purchase(new)?
        .ok_or(CheckoutError::NotAuthenticated)?;
    cart.clear_cart();

    let order = purchase.order_number();
    let total = purchase.total.to_string();
    add_breadcrumb(
        "checkout",
        "Completed purchase",
        Some(&[("order", order.as_str()), ("total", total.as_str())]),
    );

    Ok(purchase)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use softbenny_core::{Price, ProductId};

    use super::*;
    use crate::config::SessionPolicy;
    use crate::models::product::Product;
    use crate::storage::{MemoryStore, keys};

    fn product(id: i32, cents: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from_cents(cents),
            image: String::new(),
            category: "Test".to_string(),
        }
    }

    fn logged_in() -> AuthStore<MemoryStore> {
        let mut auth = AuthStore::restore(MemoryStore::new(), SessionPolicy::Trust).unwrap();
        auth.register("Ana", "a@x.com", SecretString::from("pw"))
            .unwrap();
        auth
    }

    #[test]
    fn test_checkout_records_and_clears_cart() {
        let mut auth = logged_in();
        let mut cart = CartStore::new();
        cart.add_to_cart(&product(1, 1500), 2);
        cart.add_to_cart(&product(2, 1250), 1);

        let purchase = checkout(&mut cart, &mut auth).unwrap();

        assert_eq!(purchase.total, Price::from_cents(4250));
        assert_eq!(purchase.items.len(), 2);
        assert_eq!(purchase.items[0].quantity, 2);
        assert_eq!(purchase.unit_count(), 3);
        assert!(cart.snapshot().is_empty());
        assert_eq!(auth.purchases(), vec![purchase]);
    }

    #[test]
    fn test_anonymous_checkout_keeps_cart() {
        let mut auth = AuthStore::restore(MemoryStore::new(), SessionPolicy::Trust).unwrap();
        let mut cart = CartStore::new();
        cart.add_to_cart(&product(1, 100), 1);

        let err = checkout(&mut cart, &mut auth).unwrap_err();

        assert!(matches!(err, CheckoutError::NotAuthenticated));
        assert_eq!(cart.item_count(), 1);
        assert!(auth.storage().get(keys::PURCHASES).unwrap().is_none());
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let mut auth = logged_in();
        let mut cart = CartStore::new();

        let err = checkout(&mut cart, &mut auth).unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(auth.purchases().is_empty());
    }
}
