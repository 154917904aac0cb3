//! # shop-api
//!
//! HTTP API layer for the storefront.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Entity routes over the managed relational store
//! - The checkout/payment-intent flow
//! - Auth convenience routes over the store's session primitives
//! - A cached news search proxy
//!
//! Every handler is stateless glue: parse the request, run one store or
//! processor call under the caller's session, map errors to status
//! codes, return JSON.

pub mod handlers;
pub mod news;
pub mod routes;
pub mod state;

pub use news::NewsClient;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
