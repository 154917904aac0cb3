//! Auth convenience routes: thin wrappers over the store's session,
//! login, logout, and profile-upsert primitives.
//!
//! Profile reads during login and session checks are best-effort: a
//! missing profile merges as absent fields into the user payload and
//! never fails the overall request.

use crate::handlers::{api_error, merge_user, require_str, with_cookies, HandlerResult};
use crate::state::{clear_session_cookies, session_cookies, AppState};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_core::{ApiError, Profile};
use shop_store::{AuthSession, StoreClient};
use tracing::{instrument, warn};
use uuid::Uuid;

/// The two fixed seeded demo accounts
const DEMO_ADMIN: (&str, &str) = ("admin@demo.store", "demo-admin-pass");
const DEMO_CUSTOMER: (&str, &str) = ("customer@demo.store", "demo-customer-pass");

/// Lower-case and trim an email before it reaches the store
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Deserialize)]
pub struct CheckEmailQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileId {
    #[allow(dead_code)]
    id: Uuid,
}

/// Report whether a profile already exists for an email
#[instrument(skip_all)]
pub async fn check_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CheckEmailQuery>,
) -> HandlerResult<Json<serde_json::Value>> {
    let email = normalize_email(&require_str(params.email, "email")?);

    let session = state.store_session(&headers).await;
    let rows: Vec<ProfileId> = session
        .client
        .from("profiles")
        .select("id")
        .eq("email", &email)
        .fetch()
        .await
        .map_err(api_error)?;

    Ok(Json(serde_json::json!({ "exists": !rows.is_empty() })))
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub company_number: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewProfile {
    id: Uuid,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company_number: Option<String>,
    is_admin: bool,
    updated_at: DateTime<Utc>,
}

/// Sign up a new auth user and upsert its profile row
#[instrument(skip_all)]
pub async fn create_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateProfileRequest>,
) -> HandlerResult<Response> {
    let email = normalize_email(&require_str(request.email, "email")?);
    let password = require_str(request.password, "password")?;

    let session = state.store_session(&headers).await;
    let auth = session
        .client
        .sign_up(&email, &password)
        .await
        .map_err(api_error)?;

    let row = NewProfile {
        id: auth.user.id,
        email: email.clone(),
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
        company_name: request.company_name,
        company_number: request.company_number,
        is_admin: false,
        updated_at: Utc::now(),
    };

    // Upsert under the fresh session so row-level rules see the owner
    let signed_in = session
        .client
        .clone()
        .with_access_token(auth.access_token.clone());
    let profile: Profile = signed_in
        .from("profiles")
        .upsert(&row)
        .await
        .map_err(api_error)?;

    let cookies = session_cookies(&auth.access_token, &auth.refresh_token);
    let body = serde_json::json!({ "user": merge_user(&auth.user, Some(&profile)) });
    Ok(with_cookies(cookies, Json(body)))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Sign in with email and password
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> HandlerResult<Response> {
    let email = normalize_email(&require_str(request.email, "email")?);
    let password = require_str(request.password, "password")?;

    sign_in_response(&state, &email, &password).await
}

#[derive(Debug, Deserialize)]
pub struct DemoLoginRequest {
    pub role: Option<String>,
}

/// Sign in as one of the two fixed seeded demo accounts
#[instrument(skip_all)]
pub async fn demo_login(
    State(state): State<AppState>,
    Json(request): Json<DemoLoginRequest>,
) -> HandlerResult<Response> {
    let (email, password) = match request.role.as_deref() {
        Some("admin") => DEMO_ADMIN,
        Some("customer") | None => DEMO_CUSTOMER,
        Some(other) => {
            return Err(api_error(ApiError::InvalidRequest(format!(
                "Unknown demo role: {other}"
            ))))
        }
    };

    sign_in_response(&state, email, password).await
}

/// Shared login tail: authenticate, join the profile best-effort, set
/// the session cookies
async fn sign_in_response(state: &AppState, email: &str, password: &str) -> HandlerResult<Response> {
    let client = StoreClient::anonymous(state.store.clone());
    let auth = client.sign_in(email, password).await.map_err(api_error)?;

    let profile = fetch_profile(&state.store, &auth).await;
    let cookies = session_cookies(&auth.access_token, &auth.refresh_token);
    let body = serde_json::json!({ "user": merge_user(&auth.user, profile.as_ref()) });
    Ok(with_cookies(cookies, Json(body)))
}

/// Best-effort profile join; failure is logged and yields `None`
async fn fetch_profile(
    store: &shop_store::StoreConfig,
    auth: &AuthSession,
) -> Option<Profile> {
    let client =
        StoreClient::anonymous(store.clone()).with_access_token(auth.access_token.clone());

    match client
        .from("profiles")
        .eq("id", auth.user.id)
        .fetch_one::<Profile>("Profile")
        .await
    {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("profile join failed for {}: {e}", auth.user.id);
            None
        }
    }
}

/// Revoke the session and clear its cookies
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult<Response> {
    let session = state.store_session(&headers).await;

    if let Err(e) = session.client.sign_out().await {
        // The cookies are cleared either way; a failed revocation only
        // shortens nothing.
        warn!("logout revocation failed: {e}");
    }

    Ok(with_cookies(
        clear_session_cookies(),
        Json(serde_json::json!({ "success": true })),
    ))
}

/// Session check. No session is not an error: the caller gets
/// `{ "user": null }` with 200.
#[instrument(skip_all)]
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.store_session(&headers).await;

    if session.client.tokens().access_token.is_none() {
        return with_cookies(
            session.set_cookies,
            Json(serde_json::json!({ "user": null })),
        );
    }

    let user = match session.client.current_user().await {
        Ok(user) => user,
        Err(e) => {
            // Stale or revoked token: same as no session
            warn!("session check failed: {e}");
            return with_cookies(
                session.set_cookies,
                Json(serde_json::json!({ "user": null })),
            );
        }
    };

    let profile = match session
        .client
        .from("profiles")
        .eq("id", user.id)
        .fetch_one::<Profile>("Profile")
        .await
    {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("profile join failed for {}: {e}", user.id);
            None
        }
    };

    with_cookies(
        session.set_cookies,
        Json(serde_json::json!({ "user": merge_user(&user, profile.as_ref()) })),
    )
}

/// Authenticated user lookup; unlike the session check this requires a
/// valid session
#[instrument(skip_all)]
pub async fn user(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult<Response> {
    let session = state.store_session(&headers).await;

    let user = session.client.current_user().await.map_err(api_error)?;

    let profile = match session
        .client
        .from("profiles")
        .eq("id", user.id)
        .fetch_one::<Profile>("Profile")
        .await
    {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("profile join failed for {}: {e}", user.id);
            None
        }
    };

    Ok(with_cookies(
        session.set_cookies,
        Json(serde_json::json!({ "user": merge_user(&user, profile.as_ref()) })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Buyer@Example.COM "), "buyer@example.com");
    }
}
