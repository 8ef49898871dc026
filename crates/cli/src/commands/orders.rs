//! Purchase commands: buy, history and tickets.

use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use softbenny_core::ProductId;
use softbenny_storefront::models::Purchase;
use softbenny_storefront::storage::KeyValueStore;
use softbenny_storefront::{AppError, Storefront};

/// Errors parsing a `--item` argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartItemError {
    #[error("invalid product id '{0}'")]
    InvalidId(String),
    #[error("invalid quantity '{0}' (expected a positive number)")]
    InvalidQuantity(String),
}

/// A product and quantity given on the command line as `ID` or `ID:QUANTITY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItem {
    pub id: ProductId,
    pub quantity: u32,
}

impl FromStr for CartItem {
    type Err = CartItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = s.split_once(':').unwrap_or((s, "1"));

        let id = id
            .parse::<ProductId>()
            .map_err(|_| CartItemError::InvalidId(id.to_owned()))?;
        let quantity = quantity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| CartItemError::InvalidQuantity(quantity.to_owned()))?;

        Ok(Self { id, quantity })
    }
}

/// Add `items` to a fresh cart and check out.
///
/// # Errors
///
/// Returns an error if a product is unknown, nobody is logged in, or the
/// purchase or ticket cannot be written.
#[allow(clippy::print_stdout)]
pub fn buy<S: KeyValueStore>(
    store: &mut Storefront<S>,
    items: &[CartItem],
    ticket: Option<&Path>,
) -> softbenny_storefront::Result<()> {
    for item in items {
        store.add_product(item.id, item.quantity)?;
    }

    let purchase = store.checkout()?;
    println!(
        "Order #{}: {} items, total {}",
        purchase.order_number(),
        purchase.unit_count(),
        purchase.total
    );

    if let Some(path) = ticket {
        std::fs::write(path, store.receipt(purchase.id)?)?;
        println!("Ticket written to {}", path.display());
    }
    Ok(())
}

/// Print the logged-in user's purchases, oldest first.
#[allow(clippy::print_stdout)]
pub fn history<S: KeyValueStore>(store: &Storefront<S>) {
    let state = store.auth().state();
    if !state.session.is_authenticated() {
        println!("Log in to see your purchase history");
        return;
    }
    if state.purchases.is_empty() {
        println!("No purchases yet");
        return;
    }

    for purchase in &state.purchases {
        println!(
            "#{}  {}  {:>3} items  {:>10}",
            purchase.order_number(),
            purchase.date.format("%d/%m/%Y %H:%M"),
            purchase.unit_count(),
            purchase.total.to_string()
        );
    }
}

/// Render the receipt for the purchase identified by `order`.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the purchase is not in the logged-in
/// user's history, or an error if the ticket cannot be written.
#[allow(clippy::print_stdout)]
pub fn ticket<S: KeyValueStore>(
    store: &Storefront<S>,
    order: &str,
    out: Option<&Path>,
) -> softbenny_storefront::Result<()> {
    let id = find_purchase(&store.auth().purchases(), order)
        .map(|purchase| purchase.id)
        .ok_or_else(|| AppError::NotFound(format!("order {order}")))?;
    let html = store.receipt(id)?;

    match out {
        Some(path) => {
            std::fs::write(path, html)?;
            println!("Ticket written to {}", path.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}

/// Match by order number (case-insensitive) or by full purchase ID.
fn find_purchase<'a>(purchases: &'a [Purchase], order: &str) -> Option<&'a Purchase> {
    let order = order.trim().trim_start_matches('#');
    purchases.iter().find(|purchase| {
        purchase.order_number().eq_ignore_ascii_case(order)
            || purchase.id.to_string().eq_ignore_ascii_case(order)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use softbenny_core::{Price, UserId};
    use softbenny_storefront::models::NewPurchase;

    use super::*;

    #[test]
    fn test_parse_cart_item() {
        assert_eq!(
            "8:2".parse::<CartItem>().unwrap(),
            CartItem {
                id: ProductId::new(8),
                quantity: 2
            }
        );
        assert_eq!("3".parse::<CartItem>().unwrap().quantity, 1);
        assert_eq!(
            "x:1".parse::<CartItem>().unwrap_err(),
            CartItemError::InvalidId("x".to_string())
        );
        assert!(matches!(
            "1:0".parse::<CartItem>(),
            Err(CartItemError::InvalidQuantity(_))
        ));
        assert!(matches!(
            "1:-2".parse::<CartItem>(),
            Err(CartItemError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_find_purchase_by_order_number_or_id() {
        let purchase = Purchase::record(
            NewPurchase {
                items: Vec::new(),
                total: Price::from_cents(100),
            },
            UserId::generate(),
            "2026-10-19T15:04:05Z".parse().unwrap(),
        );
        let purchases = vec![purchase.clone()];

        let order = purchase.order_number();
        assert_eq!(find_purchase(&purchases, &order), Some(&purchase));
        assert_eq!(
            find_purchase(&purchases, &format!("#{}", order.to_lowercase())),
            Some(&purchase)
        );
        assert_eq!(
            find_purchase(&purchases, &purchase.id.to_string()),
            Some(&purchase)
        );
        assert!(find_purchase(&purchases, "NOPE").is_none());
    }
}
