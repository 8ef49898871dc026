//! SoftBenny Core - Shared types library.
//!
//! This crate provides the value types used across the SoftBenny workspace:
//! - `storefront` - Cart store, auth/purchase store and local persistence
//! - `cli` - Command-line storefront front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
