//! Cart types.

use serde::Serialize;

use softbenny_core::{Price, ProductId};

use super::product::Product;

/// One row in the cart, keyed by product ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    /// The product ID (unique within a cart).
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Start a line for `product` with `quantity` units.
    #[must_use]
    pub fn new(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The cart contents plus the values derived from them.
///
/// `item_count` and `total` are recomputed from `lines` on every change and
/// cannot be set independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartState {
    lines: Vec<CartLine>,
    item_count: u64,
    total: Price,
}

impl CartState {
    /// Build a state from lines, computing the derived values.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut state = Self {
            lines,
            ..Self::default()
        };
        state.recompute();
        state
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of all line quantities.
    #[must_use]
    pub const fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    pub(crate) fn lines_mut(&mut self) -> &mut Vec<CartLine> {
        &mut self.lines
    }

    pub(crate) fn recompute(&mut self) {
        self.lines.retain(|line| line.quantity > 0);
        self.item_count = self.lines.iter().map(|line| u64::from(line.quantity)).sum();
        self.total = self.lines.iter().map(CartLine::line_total).sum();
    }
}
