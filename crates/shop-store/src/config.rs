//! # Store Configuration
//!
//! Connection settings for the managed relational store.
//! Loaded from environment variables, validated fail-fast: no client is
//! ever produced from a partial configuration.

use shop_core::ApiError;
use std::env;

/// Store connection configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store (e.g. `https://project.store.example`)
    pub base_url: String,

    /// Public (anonymous) API key, sent as the `apikey` header
    pub anon_key: String,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `STORE_URL`
    /// - `STORE_ANON_KEY`
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let base_url = env::var("STORE_URL")
            .map_err(|_| ApiError::Config("STORE_URL not set".to_string()))?;

        let anon_key = env::var("STORE_ANON_KEY")
            .map_err(|_| ApiError::Config("STORE_ANON_KEY not set".to_string()))?;

        if base_url.is_empty() {
            return Err(ApiError::Config("STORE_URL is empty".to_string()));
        }

        if anon_key.is_empty() {
            return Err(ApiError::Config("STORE_ANON_KEY is empty".to_string()));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Builder: point the client at a different base URL (for testing)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// REST endpoint for a table
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Auth endpoint path
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = StoreConfig::new("https://store.example/", "anon-key");
        assert_eq!(
            config.rest_url("products"),
            "https://store.example/rest/v1/products"
        );
        assert_eq!(
            config.auth_url("token"),
            "https://store.example/auth/v1/token"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = StoreConfig::new("https://store.example///", "k");
        assert_eq!(config.base_url, "https://store.example");
    }
}
