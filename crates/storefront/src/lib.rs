//! SoftBenny storefront library.
//!
//! Cart, account and purchase-history stores over a local key-value
//! substrate, plus the product catalog and receipt rendering. The CLI is a
//! thin presentation layer over this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod receipt;
pub mod services;
pub mod state;
pub mod storage;

pub use catalog::{Catalog, ProductFilter};
pub use config::{SessionPolicy, StorefrontConfig};
pub use error::{AppError, Result};
pub use state::Storefront;
