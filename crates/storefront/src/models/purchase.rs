//! Purchase records.
//!
//! Purchases are created only by checkout, never mutated and never deleted.
//! They are persisted with camelCase field names (`userId`, `productId`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use softbenny_core::{Price, ProductId, PurchaseId, UserId};

use super::cart::CartLine;

/// Number of characters of the purchase ID shown as the order number.
const ORDER_NUMBER_LEN: usize = 8;

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub image: String,
}

impl PurchaseItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

impl From<&CartLine> for PurchaseItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.id,
            name: line.name.clone(),
            price: line.price,
            quantity: line.quantity,
            image: line.image.clone(),
        }
    }
}

/// A purchase before it is recorded: what the caller supplies.
///
/// The store attaches the ID, user ID and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchase {
    pub items: Vec<PurchaseItem>,
    pub total: Price,
}

/// A recorded purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub items: Vec<PurchaseItem>,
    pub total: Price,
    /// When the purchase was recorded (ISO-8601 on disk).
    pub date: DateTime<Utc>,
}

impl Purchase {
    /// Complete a [`NewPurchase`] for `user_id` with a fresh ID.
    #[must_use]
    pub fn record(new: NewPurchase, user_id: UserId, date: DateTime<Utc>) -> Self {
        Self {
            id: PurchaseId::generate(),
            user_id,
            items: new.items,
            total: new.total,
            date,
        }
    }

    /// Short, human-facing order number: the first eight characters of the
    /// ID, uppercased.
    #[must_use]
    pub fn order_number(&self) -> String {
        self.id
            .to_string()
            .chars()
            .take(ORDER_NUMBER_LEN)
            .collect::<String>()
            .to_uppercase()
    }

    /// Total number of units across all items.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}
