//! # Store Client
//!
//! Request-scoped handle to the relational store. Built once per request
//! from the caller's session cookies so that every query runs under the
//! store's row-level authorization, not an application-level check.
//! There is no process-wide singleton client.

use crate::config::StoreConfig;
use crate::query::QueryBuilder;
use axum::http::HeaderMap;
use reqwest::Client;

/// Cookie names carrying the store session
pub const ACCESS_COOKIE: &str = "sf-access-token";
pub const REFRESH_COOKIE: &str = "sf-refresh-token";

/// Session tokens extracted from the request's cookie jar
#[derive(Debug, Clone, Default)]
pub struct SessionTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    /// Parse the `Cookie` header for the session token pair.
    /// Absent or malformed cookies yield an anonymous session.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut tokens = Self::default();

        let Some(cookie_header) = headers.get(axum::http::header::COOKIE) else {
            return tokens;
        };
        let Ok(raw) = cookie_header.to_str() else {
            return tokens;
        };

        for pair in raw.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            match name {
                ACCESS_COOKIE => tokens.access_token = Some(value.to_string()),
                REFRESH_COOKIE => tokens.refresh_token = Some(value.to_string()),
                _ => {}
            }
        }

        tokens
    }

    /// Whether the caller presented any session at all
    pub fn is_anonymous(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// A store client scoped to one request's session
#[derive(Clone)]
pub struct StoreClient {
    pub(crate) http: Client,
    pub(crate) config: StoreConfig,
    pub(crate) tokens: SessionTokens,
}

impl StoreClient {
    /// Create a client bound to the given session tokens
    pub fn new(config: StoreConfig, tokens: SessionTokens) -> Self {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            http,
            config,
            tokens,
        }
    }

    /// Create an anonymous client (public reads, auth endpoints)
    pub fn anonymous(config: StoreConfig) -> Self {
        Self::new(config, SessionTokens::default())
    }

    /// Start a query against a table
    pub fn from(&self, table: &str) -> QueryBuilder {
        QueryBuilder::new(self.clone(), table)
    }

    /// The bearer token for this request: the caller's access token when
    /// present, else the public key (anonymous privileges).
    pub(crate) fn bearer(&self) -> &str {
        self.tokens
            .access_token
            .as_deref()
            .unwrap_or(&self.config.anon_key)
    }

    /// Attach the store auth headers to a request
    pub(crate) fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer()))
    }

    /// Swap in a freshly refreshed access token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.tokens.access_token = Some(token.into());
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn tokens(&self) -> &SessionTokens {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;

    #[test]
    fn test_tokens_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            "theme=dark; sf-access-token=at-123; sf-refresh-token=rt-456"
                .parse()
                .unwrap(),
        );

        let tokens = SessionTokens::from_headers(&headers);
        assert_eq!(tokens.access_token.as_deref(), Some("at-123"));
        assert_eq!(tokens.refresh_token.as_deref(), Some("rt-456"));
        assert!(!tokens.is_anonymous());
    }

    #[test]
    fn test_missing_cookie_header_is_anonymous() {
        let tokens = SessionTokens::from_headers(&HeaderMap::new());
        assert!(tokens.is_anonymous());
    }

    #[test]
    fn test_anonymous_client_uses_public_key() {
        let client = StoreClient::anonymous(StoreConfig::new("https://store.example", "anon-key"));
        assert_eq!(client.bearer(), "anon-key");
    }

    #[test]
    fn test_session_client_uses_access_token() {
        let tokens = SessionTokens {
            access_token: Some("at-123".into()),
            refresh_token: None,
        };
        let client = StoreClient::new(StoreConfig::new("https://store.example", "anon-key"), tokens);
        assert_eq!(client.bearer(), "at-123");
    }
}
