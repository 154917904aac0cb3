//! Category admin routes.

use crate::handlers::{api_error, require_str, HandlerResult};
use crate::state::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use shop_core::{slugify, Category, NewCategory};
use shop_store::SortDirection;
use tracing::instrument;

/// List all categories, name ascending
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<Json<Vec<Category>>> {
    let session = state.store_session(&headers).await;

    let categories: Vec<Category> = session
        .client
        .from("categories")
        .order_by("name", SortDirection::Asc)
        .fetch()
        .await
        .map_err(api_error)?;

    Ok(Json(categories))
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Create a category. The slug is derived from the name when absent;
/// the activation flag defaults to true.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateCategoryRequest>,
) -> HandlerResult<Json<Category>> {
    let name = require_str(request.name, "name")?;

    let slug = match request.slug {
        Some(slug) if !slug.trim().is_empty() => slug,
        _ => slugify(&name),
    };

    let row = NewCategory {
        name,
        slug,
        description: request.description,
        is_active: request.is_active.unwrap_or(true),
        updated_at: Utc::now(),
    };

    let session = state.store_session(&headers).await;
    let category: Category = session
        .client
        .from("categories")
        .insert(&row)
        .await
        .map_err(api_error)?;

    Ok(Json(category))
}
