//! # shop-store
//!
//! Request-scoped client for the managed relational store.
//!
//! The store is the sole source of truth: persistence, auth, and
//! row-level authorization all live behind its REST interface. This
//! crate provides:
//! - `StoreConfig` loaded fail-fast from the environment
//! - `SessionTokens` parsed from the caller's cookie jar
//! - `StoreClient` bound to one request's session
//! - a query builder for single-shot reads and writes
//! - auth wrappers (sign-in, sign-up, sign-out, user, refresh)
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_store::{SessionTokens, StoreClient, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let client = StoreClient::new(config, SessionTokens::from_headers(&headers));
//!
//! let products: Vec<Product> = client
//!     .from("products")
//!     .eq("is_active", true)
//!     .or_ilike(&["name", "description"], "tea")
//!     .order_by("name", SortDirection::Asc)
//!     .fetch()
//!     .await?;
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod query;

// Re-exports
pub use auth::AuthSession;
pub use client::{SessionTokens, StoreClient, ACCESS_COOKIE, REFRESH_COOKIE};
pub use config::StoreConfig;
pub use query::{QueryBuilder, SortDirection};
