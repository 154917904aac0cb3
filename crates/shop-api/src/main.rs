//! # Storefront API
//!
//! Server-side route handlers and data-access glue for the storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STORE_URL=https://project.store.example
//! export STORE_ANON_KEY=public-anon-key
//! export STRIPE_SECRET_KEY=sk_test_...
//! export NEWS_API_KEY=...
//!
//! # Run the server
//! shop-api
//! ```

use shop_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state (fails fast on missing store or
    // processor configuration)
    let state = AppState::from_env()?;

    let addr = state.config.socket_addr();

    info!("Environment: {}", state.config.environment);
    info!("Store: {}", state.store.base_url);

    let app = routes::create_router(state);

    info!("Storefront API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
