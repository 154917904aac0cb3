//! Product routes, public and admin.
//!
//! Reads accept a free-text `search` (case-insensitive substring match
//! against name and description), an exact-match `category` filter, and
//! a whitelisted sort field with direction. Public listings only see
//! active products.

use crate::handlers::{api_error, HandlerResult};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use shop_core::Product;
use shop_store::{QueryBuilder, SortDirection};
use tracing::instrument;

/// Featured listings are capped
const FEATURED_LIMIT: usize = 12;

const SORTABLE_FIELDS: &[&str] = &["name", "price", "created_at", "updated_at"];

#[derive(Debug, Deserialize, Default)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

fn apply_filters(
    mut query: QueryBuilder,
    params: &ProductListQuery,
    default_sort: (&str, SortDirection),
) -> QueryBuilder {
    if let Some(ref term) = params.search {
        if !term.trim().is_empty() {
            query = query.or_ilike(&["name", "description"], term.trim());
        }
    }

    if let Some(ref category) = params.category {
        query = query.eq("category_id", category);
    }

    match params.sort.as_deref() {
        Some(field) if SORTABLE_FIELDS.contains(&field) => {
            query.order_by(field, SortDirection::parse(params.direction.as_deref()))
        }
        _ => query.order_by(default_sort.0, default_sort.1),
    }
}

/// Admin product list: all rows, default newest-first
#[instrument(skip_all)]
pub async fn admin_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ProductListQuery>,
) -> HandlerResult<Json<Vec<Product>>> {
    let session = state.store_session(&headers).await;

    let query = session.client.from("products");
    let products: Vec<Product> =
        apply_filters(query, &params, ("created_at", SortDirection::Desc))
            .fetch()
            .await
            .map_err(api_error)?;

    Ok(Json(products))
}

/// Public product list: active only, default name ascending
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ProductListQuery>,
) -> HandlerResult<Json<Vec<Product>>> {
    let session = state.store_session(&headers).await;

    let query = session.client.from("products").eq("is_active", true);
    let products: Vec<Product> = apply_filters(query, &params, ("name", SortDirection::Asc))
        .fetch()
        .await
        .map_err(api_error)?;

    Ok(Json(products))
}

/// Featured products, capped at twelve
#[instrument(skip_all)]
pub async fn featured(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<Json<Vec<Product>>> {
    let session = state.store_session(&headers).await;

    let products: Vec<Product> = session
        .client
        .from("products")
        .eq("is_active", true)
        .eq("is_featured", true)
        .order_by("created_at", SortDirection::Desc)
        .limit(FEATURED_LIMIT)
        .fetch()
        .await
        .map_err(api_error)?;

    Ok(Json(products))
}

/// Single product by slug; zero rows is 404, any other store failure 400
#[instrument(skip(state, headers))]
pub async fn by_slug(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> HandlerResult<Json<Product>> {
    let session = state.store_session(&headers).await;

    let product: Product = session
        .client
        .from("products")
        .eq("slug", &slug)
        .eq("is_active", true)
        .fetch_one("Product")
        .await
        .map_err(api_error)?;

    Ok(Json(product))
}
