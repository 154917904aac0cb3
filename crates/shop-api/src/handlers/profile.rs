//! Profile self-service routes.

use crate::handlers::{api_error, require_str, HandlerResult};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_core::Profile;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Fetch a profile by user id
#[instrument(skip_all)]
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ProfileQuery>,
) -> HandlerResult<Json<Profile>> {
    let user_id = require_str(params.user_id, "userId")?;

    let session = state.store_session(&headers).await;
    let profile: Profile = session
        .client
        .from("profiles")
        .eq("id", &user_id)
        .fetch_one("Profile")
        .await
        .map_err(api_error)?;

    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub company_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileFieldsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Update a profile's contact fields, stamping `updated_at` here rather
/// than leaving it to the store
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateProfileRequest>,
) -> HandlerResult<Json<Profile>> {
    let user_id = require_str(request.user_id, "userId")?;

    let patch = ProfileFieldsPatch {
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
        company_name: request.company_name,
        company_number: request.company_number,
        address: request.address,
        city: request.city,
        postcode: request.postcode,
        updated_at: Utc::now(),
    };

    let session = state.store_session(&headers).await;
    let profile: Profile = session
        .client
        .from("profiles")
        .eq("id", &user_id)
        .update(&patch, "Profile")
        .await
        .map_err(api_error)?;

    Ok(Json(profile))
}
