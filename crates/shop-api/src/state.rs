//! # Application State
//!
//! Shared state for the Axum application: server config plus the three
//! outbound clients (store, processor, news). The store client itself is
//! never shared between requests; `store_session` builds one per request
//! from the caller's cookie jar.

use crate::news::NewsClient;
use axum::http::HeaderMap;
use shop_store::{SessionTokens, StoreClient, StoreConfig, ACCESS_COOKIE, REFRESH_COOKIE};
use shop_stripe::PaymentIntentClient;
use tracing::{info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server config
    pub config: AppConfig,
    /// Store connection settings (a client is built per request)
    pub store: StoreConfig,
    /// Payment processor client
    pub stripe: PaymentIntentClient,
    /// News search proxy
    pub news: NewsClient,
}

impl AppState {
    /// Build state from the environment, failing fast when the store or
    /// processor configuration is incomplete.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let store = StoreConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to configure store client: {e}"))?;

        let stripe = PaymentIntentClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize payment client: {e}"))?;

        let news = NewsClient::from_env();

        Ok(Self {
            config,
            store,
            stripe,
            news,
        })
    }

    /// Explicit constructor (tests point the clients at mock servers)
    pub fn new(
        config: AppConfig,
        store: StoreConfig,
        stripe: PaymentIntentClient,
        news: NewsClient,
    ) -> Self {
        Self {
            config,
            store,
            stripe,
            news,
        }
    }

    /// Build a store client scoped to this request's session.
    ///
    /// When the access token has expired out of the jar but a refresh
    /// token survives, the session is refreshed opportunistically. That
    /// refresh is a best-effort side channel: failure is logged and the
    /// request proceeds anonymously, since it only affects session
    /// longevity, not the correctness of the current request.
    pub async fn store_session(&self, headers: &HeaderMap) -> StoreSession {
        let tokens = SessionTokens::from_headers(headers);
        let client = StoreClient::new(self.store.clone(), tokens.clone());

        if tokens.access_token.is_some() || tokens.refresh_token.is_none() {
            return StoreSession {
                client,
                set_cookies: Vec::new(),
            };
        }

        let refresh_token = tokens.refresh_token.as_deref().unwrap_or_default();
        match client.refresh_session(refresh_token).await {
            Ok(session) => {
                info!("session refreshed");
                let set_cookies = session_cookies(&session.access_token, &session.refresh_token);
                StoreSession {
                    client: client.with_access_token(session.access_token),
                    set_cookies,
                }
            }
            Err(e) => {
                warn!("session refresh failed, continuing anonymously: {e}");
                StoreSession {
                    client,
                    set_cookies: Vec::new(),
                }
            }
        }
    }
}

/// A request-scoped store client plus any refreshed cookies to write back
pub struct StoreSession {
    pub client: StoreClient,
    /// `Set-Cookie` values to append to the response, best effort
    pub set_cookies: Vec<String>,
}

/// Render the session token pair as cookie strings
pub fn session_cookies(access_token: &str, refresh_token: &str) -> Vec<String> {
    vec![
        format!("{ACCESS_COOKIE}={access_token}; Path=/; HttpOnly; SameSite=Lax"),
        format!("{REFRESH_COOKIE}={refresh_token}; Path=/; HttpOnly; SameSite=Lax"),
    ]
}

/// Expired cookies that clear the session on logout
pub fn clear_session_cookies() -> Vec<String> {
    vec![
        format!("{ACCESS_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
        format!("{REFRESH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
        };

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_session_cookie_shapes() {
        let cookies = session_cookies("at", "rt");
        assert!(cookies[0].starts_with("sf-access-token=at;"));
        assert!(cookies[1].starts_with("sf-refresh-token=rt;"));

        let cleared = clear_session_cookies();
        assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));
    }
}
