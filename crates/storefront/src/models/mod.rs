//! Domain models for the storefront.
//!
//! These types are the shapes that flow through the stores and, for users,
//! sessions and purchases, the shapes persisted to local storage.

pub mod cart;
pub mod product;
pub mod purchase;
pub mod session;
pub mod user;

pub use cart::{CartLine, CartState};
pub use product::Product;
pub use purchase::{NewPurchase, Purchase, PurchaseItem};
pub use session::Session;
pub use user::{User, UserRecord};
