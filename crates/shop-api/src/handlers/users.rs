//! Admin user management.
//!
//! Carries the one non-trivial business rule in the system: at least one
//! profile must keep `is_admin = true` at all times. The guard runs
//! before any write reaches the store.

use crate::handlers::{api_error, HandlerResult};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_core::{ApiError, Profile};
use shop_store::StoreClient;
use tracing::{instrument, warn};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub is_admin: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub company_number: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    is_admin: Option<bool>,
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
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct AdminId {
    #[allow(dead_code)]
    id: Uuid,
}

/// Update a user's profile, blocking demotion of the sole remaining admin
#[instrument(skip(state, headers, request), fields(user_id = %user_id))]
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> HandlerResult<Json<Profile>> {
    let session = state.store_session(&headers).await;

    if request.is_admin == Some(false) {
        guard_last_admin(&session.client, user_id)
            .await
            .map_err(api_error)?;
    }

    let patch = ProfilePatch {
        is_admin: request.is_admin,
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
        company_name: request.company_name,
        company_number: request.company_number,
        updated_at: Utc::now(),
    };

    let profile: Profile = session
        .client
        .from("profiles")
        .eq("id", user_id)
        .update(&patch, "User")
        .await
        .map_err(api_error)?;

    Ok(Json(profile))
}

/// Reject the demotion when the target is the last admin standing.
/// Runs entirely on reads: a rejected request leaves the store untouched.
async fn guard_last_admin(client: &StoreClient, user_id: Uuid) -> Result<(), ApiError> {
    let target: Profile = client
        .from("profiles")
        .eq("id", user_id)
        .fetch_one("User")
        .await?;

    if !target.is_admin {
        return Ok(());
    }

    let admins: Vec<AdminId> = client
        .from("profiles")
        .select("id")
        .eq("is_admin", true)
        .fetch()
        .await?;

    if admins.len() <= 1 {
        warn!("blocked demotion of last admin {user_id}");
        return Err(ApiError::InvalidRequest(
            "Cannot remove the last remaining admin".to_string(),
        ));
    }

    Ok(())
}
