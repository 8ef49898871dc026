//! Catalog product type.

use serde::{Deserialize, Serialize};

use softbenny_core::{Price, ProductId};

/// A product from the static catalog.
///
/// Immutable once loaded; the cart copies the fields it needs at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog ID (also the cart line key).
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Longer description, searched alongside the name.
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Image URL.
    pub image: String,
    /// Category label used by the catalog filter.
    pub category: String,
}
