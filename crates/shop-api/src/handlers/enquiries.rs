//! Enquiry routes: public submission, admin listing.

use crate::handlers::{api_error, require_str, HandlerResult};
use crate::state::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use shop_core::{Enquiry, NewEnquiry};
use shop_store::SortDirection;
use tracing::instrument;
use uuid::Uuid;

/// Admin list, newest first, with the referenced product's name and
/// slug joined in by the store
#[instrument(skip_all)]
pub async fn admin_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<Json<Vec<Enquiry>>> {
    let session = state.store_session(&headers).await;

    let enquiries: Vec<Enquiry> = session
        .client
        .from("enquiries")
        .select("*,product:products(name,slug)")
        .order_by("created_at", SortDirection::Desc)
        .fetch()
        .await
        .map_err(api_error)?;

    Ok(Json(enquiries))
}

#[derive(Debug, Deserialize)]
pub struct CreateEnquiryRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub product_id: Option<Uuid>,
}

/// Submit a contact-form enquiry
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateEnquiryRequest>,
) -> HandlerResult<Json<Enquiry>> {
    let row = NewEnquiry {
        name: require_str(request.name, "name")?,
        email: require_str(request.email, "email")?,
        phone: request.phone,
        subject: request.subject,
        message: require_str(request.message, "message")?,
        product_id: request.product_id,
    };

    let session = state.store_session(&headers).await;
    let enquiry: Enquiry = session
        .client
        .from("enquiries")
        .insert(&row)
        .await
        .map_err(api_error)?;

    Ok(Json(enquiry))
}
