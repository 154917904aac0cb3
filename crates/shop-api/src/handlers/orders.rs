//! Order read routes and the admin CSV export.

use crate::handlers::{api_error, HandlerResult};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use shop_core::Order;
use shop_store::SortDirection;
use tracing::instrument;

#[derive(Debug, Deserialize, Default)]
pub struct OrderListQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub status: Option<String>,
}

/// List orders, newest first, filtered by user and/or status
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<OrderListQuery>,
) -> HandlerResult<Json<Vec<Order>>> {
    let session = state.store_session(&headers).await;

    let mut query = session
        .client
        .from("orders")
        .order_by("created_at", SortDirection::Desc);
    if let Some(ref user_id) = params.user_id {
        query = query.eq("user_id", user_id);
    }
    if let Some(ref status) = params.status {
        query = query.eq("status", status);
    }

    let orders: Vec<Order> = query.fetch().await.map_err(api_error)?;
    Ok(Json(orders))
}

/// Single order by its human-readable number
#[instrument(skip(state, headers))]
pub async fn by_number(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_number): Path<String>,
) -> HandlerResult<Json<Order>> {
    let session = state.store_session(&headers).await;

    let order: Order = session
        .client
        .from("orders")
        .eq("order_number", &order_number)
        .fetch_one("Order")
        .await
        .map_err(api_error)?;

    Ok(Json(order))
}

#[derive(Debug, Deserialize, Default)]
pub struct ExportQuery {
    pub format: Option<String>,
    pub status: Option<String>,
}

/// Fixed column order for the CSV export
const EXPORT_COLUMNS: &[&str] = &[
    "order_number",
    "user_id",
    "status",
    "payment_status",
    "subtotal",
    "shipping_cost",
    "total",
    "created_at",
];

/// Admin order export. `format=csv` returns a `text/csv` attachment;
/// anything else returns the rows as JSON.
#[instrument(skip_all)]
pub async fn export(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ExportQuery>,
) -> HandlerResult<Response> {
    let session = state.store_session(&headers).await;

    let mut query = session
        .client
        .from("orders")
        .order_by("created_at", SortDirection::Desc);
    if let Some(ref status) = params.status {
        query = query.eq("status", status);
    }

    let orders: Vec<Order> = query.fetch().await.map_err(api_error)?;

    if params.format.as_deref() != Some("csv") {
        return Ok(Json(orders).into_response());
    }

    let mut csv = EXPORT_COLUMNS.join(",");
    csv.push('\n');
    for order in &orders {
        let row = [
            csv_field(&order.order_number),
            order.user_id.to_string(),
            status_str(&order.status),
            status_str(&order.payment_status),
            order.subtotal.to_string(),
            order.shipping_cost.to_string(),
            order.total.to_string(),
            order.created_at.to_rfc3339(),
        ];
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"orders.csv\"".to_string(),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Render a status enum using its wire (snake_case) spelling
fn status_str<T: serde::Serialize>(status: &T) -> String {
    serde_json::to_value(status)
        .ok()
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_default()
}

/// Quote a CSV field when it contains a delimiter or quote
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_spelling() {
        use shop_core::{OrderStatus, PaymentStatus};
        assert_eq!(status_str(&OrderStatus::Pending), "pending");
        assert_eq!(status_str(&PaymentStatus::Paid), "paid");
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("ORD-1001"), "ORD-1001");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
