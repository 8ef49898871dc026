//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - The in-memory cart and its derived totals
//! - `auth` - Session state machine, accounts and purchase history
//! - `checkout` - Turning the cart into a recorded purchase

pub mod auth;
pub mod cart;
pub mod checkout;

pub use auth::{AuthError, AuthState, AuthStore};
pub use cart::CartStore;
pub use checkout::{CheckoutError, checkout};
