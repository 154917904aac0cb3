//! # Auth Sub-client
//!
//! Wrappers over the store's built-in auth endpoints: password sign-in,
//! sign-up, sign-out, user lookup, and token refresh. Authentication
//! itself is entirely the store's concern; this layer only moves tokens.

use crate::client::StoreClient;
use crate::query::store_message;
use serde::{Deserialize, Serialize};
use shop_core::{ApiError, ApiResult, AuthUser};
use tracing::{debug, error, instrument};

/// A session issued by the store's auth endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl StoreClient {
    /// Sign in with email and password.
    ///
    /// A credential mismatch from the store becomes the fixed
    /// `InvalidCredentials` message rather than the store's own text.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        let url = self.config.auth_url("token");
        let request = self
            .http
            .post(&url)
            .query(&[("grant_type", "password")])
            .json(&Credentials { email, password });

        let response = self
            .authed(request)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::upstream)?;

        if status == 400 || status == 401 || status == 422 {
            debug!("credential mismatch for {email}");
            return Err(ApiError::InvalidCredentials);
        }
        if !status.is_success() {
            error!("auth token endpoint failed: status={status}, body={body}");
            return Err(ApiError::StoreRejected {
                message: store_message(&body, status.as_u16()),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::Internal(format!("malformed auth response: {e}")))
    }

    /// Exchange a refresh token for a fresh session
    #[instrument(skip_all)]
    pub async fn refresh_session(&self, refresh_token: &str) -> ApiResult<AuthSession> {
        let url = self.config.auth_url("token");
        let request = self
            .http
            .post(&url)
            .query(&[("grant_type", "refresh_token")])
            .json(&serde_json::json!({ "refresh_token": refresh_token }));

        let response = self
            .authed(request)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::upstream)?;

        if !status.is_success() {
            return Err(ApiError::StoreRejected {
                message: store_message(&body, status.as_u16()),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::Internal(format!("malformed auth response: {e}")))
    }

    /// Register a new auth user
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(&self, email: &str, password: &str) -> ApiResult<AuthSession> {
        let url = self.config.auth_url("signup");
        let request = self.http.post(&url).json(&Credentials { email, password });

        let response = self
            .authed(request)
            .send()
            .await
            .map_err(ApiError::upstream)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::upstream)?;

        if !status.is_success() {
            error!("signup failed: status={status}, body={body}");
            return Err(ApiError::StoreRejected {
                message: store_message(&body, status.as_u16()),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::Internal(format!("malformed auth response: {e}")))
    }

    /// Fetch the auth user for this client's session
    #[instrument(skip_all)]
    pub async fn current_user(&self) -> ApiResult<AuthUser> {
        if self.tokens.access_token.is_none() {
            return Err(ApiError::Unauthorized);
        }

        let url = self.config.auth_url("user");
        let response = self
            .authed(self.http.get(&url))
            .send()
            .await
            .map_err(ApiError::upstream)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::upstream)?;

        if status == 401 || status == 403 {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::StoreRejected {
                message: store_message(&body, status.as_u16()),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::Internal(format!("malformed auth response: {e}")))
    }

    /// Revoke this client's session. A missing session is not an error.
    #[instrument(skip_all)]
    pub async fn sign_out(&self) -> ApiResult<()> {
        if self.tokens.access_token.is_none() {
            return Ok(());
        }

        let url = self.config.auth_url("logout");
        let response = self
            .authed(self.http.post(&url))
            .send()
            .await
            .map_err(ApiError::upstream)?;

        let status = response.status();
        if !status.is_success() && status != 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::StoreRejected {
                message: store_message(&body, status.as_u16()),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SessionTokens;
    use crate::config::StoreConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_body() -> serde_json::Value {
        serde_json::json!({
            "access_token": "at-new",
            "refresh_token": "rt-new",
            "expires_in": 3600,
            "user": {
                "id": "5caad5a8-60e3-4b86-9f2a-3bd49f3ba005",
                "email": "buyer@example.com"
            }
        })
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
            .mount(&server)
            .await;

        let client = StoreClient::anonymous(StoreConfig::new(server.uri(), "anon-key"));
        let session = client.sign_in("buyer@example.com", "pw").await.unwrap();
        assert_eq!(session.access_token, "at-new");
        assert_eq!(session.user.email.as_deref(), Some("buyer@example.com"));
    }

    #[tokio::test]
    async fn test_sign_in_credential_mismatch_is_fixed_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let client = StoreClient::anonymous(StoreConfig::new(server.uri(), "anon-key"));
        let err = client.sign_in("buyer@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[tokio::test]
    async fn test_current_user_without_session_is_unauthorized() {
        let client = StoreClient::anonymous(StoreConfig::new("http://localhost:1", "anon-key"));
        let err = client.current_user().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_refresh_session() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
            .mount(&server)
            .await;

        let client = StoreClient::anonymous(StoreConfig::new(server.uri(), "anon-key"));
        let session = client.refresh_session("rt-old").await.unwrap();
        assert_eq!(session.refresh_token, "rt-new");
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_noop() {
        let client = StoreClient::new(
            StoreConfig::new("http://localhost:1", "anon-key"),
            SessionTokens::default(),
        );
        client.sign_out().await.unwrap();
    }
}
