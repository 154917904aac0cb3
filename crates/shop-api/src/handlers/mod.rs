//! # Request Handlers
//!
//! Axum request handlers for the storefront API. Every handler follows
//! the same shape: parse the request, validate caller-required fields
//! before any external call, forward one query to the store (or the
//! processor), and map failures onto the shared error taxonomy.

pub mod auth;
pub mod categories;
pub mod checkout;
pub mod enquiries;
pub mod news;
pub mod orders;
pub mod products;
pub mod profile;
pub mod users;
pub mod webhook;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shop_core::{ApiError, AuthUser, Profile};
use tracing::error;

/// Error response body: `{ "error": "..." }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error half of every handler's return type
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Result alias for handlers
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Map a domain error onto its HTTP response.
/// Internal details were already logged where they occurred; only the
/// client-safe message leaves the process.
pub fn api_error(err: ApiError) -> HandlerError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!("request failed: {err}");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Reject with 400 when a caller-required field is absent
pub fn require<T>(value: Option<T>, field: &str) -> HandlerResult<T> {
    value.ok_or_else(|| api_error(ApiError::missing(field)))
}

/// Reject with 400 when a required string field is absent or blank
pub fn require_str(value: Option<String>, field: &str) -> HandlerResult<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(api_error(ApiError::missing(field))),
    }
}

/// Append best-effort `Set-Cookie` values to a response
pub fn with_cookies(cookies: Vec<String>, inner: impl IntoResponse) -> Response {
    let mut response = inner.into_response();
    for cookie in cookies {
        if let Ok(value) = cookie.parse() {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

/// Merge a profile's fields into the auth user payload. The profile is
/// an optional join: when it is missing, the user object simply lacks
/// those fields.
pub fn merge_user(user: &AuthUser, profile: Option<&Profile>) -> serde_json::Value {
    let mut value = serde_json::to_value(user).unwrap_or_default();

    if let (Some(map), Some(profile)) = (value.as_object_mut(), profile) {
        if let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(profile) {
            for (key, field) in fields {
                map.entry(key).or_insert(field);
            }
        }
    }

    value
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "shop-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
