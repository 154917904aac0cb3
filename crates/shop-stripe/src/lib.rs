//! # shop-stripe
//!
//! Payment processor client for the storefront API.
//!
//! This crate provides:
//! - `PaymentIntentClient` for creating payment intents (the browser
//!   completes the charge with the processor using the client secret)
//! - `IntentMetadata` consolidating the two legacy metadata shapes into
//!   one configurable flow
//! - webhook signature verification
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_stripe::{CreateIntent, IntentMetadata, PaymentIntentClient};
//! use shop_core::Currency;
//!
//! let client = PaymentIntentClient::from_env()?;
//!
//! let intent = client.create_intent(&CreateIntent {
//!     amount_minor: Currency::USD.to_minor_units(total),
//!     currency: Currency::USD,
//!     metadata: IntentMetadata::Checkout {
//!         order_id: order.id.to_string(),
//!         user_id: order.user_id.to_string(),
//!         customer_email: Some(email),
//!     },
//!     receipt_email: None,
//! }).await?;
//!
//! // Return intent.client_secret to the caller
//! ```

pub mod config;
pub mod intent;
pub mod webhook;

// Re-exports
pub use config::StripeConfig;
pub use intent::{CreateIntent, IntentMetadata, PaymentIntent, PaymentIntentClient};
pub use webhook::{verify_webhook, WebhookEvent, WebhookEventKind};
