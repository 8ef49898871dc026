//! Printable purchase receipts ("tickets").
//!
//! Rendering is a pure function of the purchase and the store name.

use askama::Template;

use crate::models::purchase::Purchase;

/// Receipt timestamp format, e.g. `19/10/2026, 15:04:05`.
const DATE_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// One receipt row, preformatted for display.
#[derive(Debug, Clone)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// HTML receipt for a single purchase.
#[derive(Debug, Template)]
#[template(path = "receipt.html")]
pub struct ReceiptTemplate {
    pub store_name: String,
    pub order_number: String,
    pub date: String,
    pub items: Vec<ReceiptLine>,
    pub total: String,
}

impl ReceiptTemplate {
    /// Build the view for `purchase`.
    #[must_use]
    pub fn new(purchase: &Purchase, store_name: &str) -> Self {
        Self {
            store_name: store_name.to_owned(),
            order_number: purchase.order_number(),
            date: purchase.date.format(DATE_FORMAT).to_string(),
            items: purchase
                .items
                .iter()
                .map(|item| ReceiptLine {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_price: item.price.to_string(),
                    line_total: item.line_total().to_string(),
                })
                .collect(),
            total: purchase.total.to_string(),
        }
    }
}

/// Render the HTML receipt for `purchase`.
///
/// # Errors
///
/// Returns `askama::Error` if rendering fails.
pub fn render_receipt(purchase: &Purchase, store_name: &str) -> Result<String, askama::Error> {
    ReceiptTemplate::new(purchase, store_name).render()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use softbenny_core::{Price, ProductId, UserId};

    use super::*;
    use crate::models::purchase::PurchaseItem;

    fn purchase() -> Purchase {
        Purchase {
            id: "3f2a9c1e-0000-4000-8000-000000000000".parse().unwrap(),
            user_id: UserId::generate(),
            items: vec![
                PurchaseItem {
                    product_id: ProductId::new(1),
                    name: "Mouse <Pro>".to_string(),
                    price: Price::from_cents(1250),
                    quantity: 2,
                    image: String::new(),
                },
                PurchaseItem {
                    product_id: ProductId::new(2),
                    name: "Pad".to_string(),
                    price: Price::from_cents(1750),
                    quantity: 1,
                    image: String::new(),
                },
            ],
            total: Price::from_cents(4250),
            date: "2026-10-19T15:04:05Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_receipt_contents() {
        let html = render_receipt(&purchase(), "SoftBenny").unwrap();

        assert!(html.contains("<h1>SoftBenny</h1>"));
        assert!(html.contains("Ticket de Compra"));
        assert!(html.contains("Orden #3F2A9C1E"));
        assert!(html.contains("19/10/2026, 15:04:05"));
        assert!(html.contains("Cant: 2 x $12.50"));
        assert!(html.contains("$25.00"));
        assert!(html.contains("TOTAL"));
        assert!(html.contains("$42.50"));
        assert!(html.contains("¡Gracias por tu compra!"));
        assert!(html.contains("Visítanos en SoftBenny"));
    }

    #[test]
    fn test_item_names_are_escaped() {
        let html = render_receipt(&purchase(), "SoftBenny").unwrap();
        assert!(!html.contains("Mouse <Pro>"));
        assert!(html.contains("Mouse &#60;Pro&#62;") || html.contains("Mouse &lt;Pro&gt;"));
    }
}
