//! Static product catalog.
//!
//! The catalog is a read-only list of products provided at startup, either
//! from a JSON file or from the copy bundled into the binary.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use softbenny_core::{Price, ProductId};

use crate::models::product::Product;

/// Pseudo-category that matches every product.
pub const ALL_CATEGORIES: &str = "Todos";

/// Highest accepted unit price, in cents (1,000,000.00).
pub const MAX_UNIT_PRICE_CENTS: u32 = 100_000_000;

const BUNDLED: &str = include_str!("../data/products.json");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog is not a JSON list of products.
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an ID.
    #[error("duplicate product id {0}")]
    DuplicateProduct(ProductId),

    /// A product costs more than [`MAX_UNIT_PRICE_CENTS`].
    #[error("product {id} is priced at {price}, above the catalog maximum")]
    PriceTooHigh { id: ProductId, price: Price },
}

/// Search and category criteria for [`Catalog::filter`].
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring matched against name or description.
    pub search: Option<String>,
    /// Exact category, or `None`/[`ALL_CATEGORIES`] for every category.
    pub category: Option<String>,
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        let matches_search = self.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            product.name.to_lowercase().contains(&term)
                || product.description.to_lowercase().contains(&term)
        });

        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|category| category == ALL_CATEGORIES || category == product.category);

        matches_search && matches_category
    }
}

/// The product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products, rejecting duplicate IDs and prices
    /// above [`MAX_UNIT_PRICE_CENTS`].
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateProduct` if two products share an ID,
    /// or `CatalogError::PriceTooHigh`.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let max_price = Price::from_cents(MAX_UNIT_PRICE_CENTS);
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateProduct(product.id));
            }
            if product.price > max_price {
                return Err(CatalogError::PriceTooHigh {
                    id: product.id,
                    price: product.price,
                });
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON list of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` on malformed JSON, or
    /// `CatalogError::DuplicateProduct`.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, or any error
    /// from [`Catalog::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// The catalog compiled into the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled file itself is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// [`ALL_CATEGORIES`] followed by each distinct category in first-seen
    /// order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = vec![ALL_CATEGORIES];
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Products matching `filter`, in catalog order.
    pub fn filter<'a>(&'a self, filter: &'a ProductFilter) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |product| filter.matches(product))
    }
}
