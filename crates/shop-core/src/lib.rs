//! # shop-core
//!
//! Domain types and error taxonomy for the storefront API.
//!
//! This crate provides:
//! - `ApiError` for typed error handling with HTTP status mapping
//! - `Category`, `Product` catalog rows
//! - `Order`, `OrderItem`, `Payment` checkout rows
//! - `Profile`, `AuthUser`, `Enquiry` user-facing rows
//! - `slugify` and money helpers
//!
//! No I/O happens here; the client crates (`shop-store`, `shop-stripe`)
//! and the HTTP layer (`shop-api`) build on these types.

pub mod catalog;
pub mod enquiry;
pub mod error;
pub mod money;
pub mod order;
pub mod profile;
pub mod slug;

// Re-exports for convenience
pub use catalog::{Category, NewCategory, Product};
pub use enquiry::{Enquiry, EnquiryProduct, NewEnquiry};
pub use error::{ApiError, ApiResult};
pub use money::{order_total, Currency};
pub use order::{
    NewOrder, NewPayment, Order, OrderItem, OrderStatus, Payment, PaymentStatus, ShippingDetails,
};
pub use profile::{AuthUser, Profile};
pub use slug::slugify;
