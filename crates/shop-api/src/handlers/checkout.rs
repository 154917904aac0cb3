//! Checkout flow: order insertion, payment-intent creation, and the
//! payment row that ties them together.
//!
//! Failure policy: store-write failures before the processor has issued
//! an intent abort the request, so no orphaned intents are created.
//! Once an intent exists, a failure to record the local payment row is
//! logged and swallowed — the buyer was already promised a payment they
//! can complete, and the missing row is reconciled out-of-band via the
//! processor webhook.

use crate::handlers::{api_error, require, require_str, HandlerResult};
use crate::state::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use shop_core::{
    order_total, ApiError, Currency, NewOrder, NewPayment, Order, OrderItem, OrderStatus, Payment,
    PaymentStatus, Profile, ShippingDetails,
};
use shop_stripe::{CreateIntent, IntentMetadata};
use tracing::{error, info, instrument};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: Option<Uuid>,
    pub order_number: Option<String>,
    pub items: Option<Vec<OrderItem>>,
    pub subtotal: Option<f64>,
    pub shipping_cost: Option<f64>,
    pub total: Option<f64>,
    pub shipping: Option<ShippingDetails>,
}

/// Insert an order row with status `pending` / payment-status `pending`.
/// All required fields are validated before the store is contacted.
#[instrument(skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateOrderRequest>,
) -> HandlerResult<Json<Order>> {
    let user_id = require(request.user_id, "user_id")?;
    let order_number = require_str(request.order_number, "order_number")?;
    let items = require(request.items, "items")?;
    if items.is_empty() {
        return Err(api_error(ApiError::InvalidRequest(
            "Order has no items".to_string(),
        )));
    }
    let total = require(request.total, "total")?;
    let shipping = require(request.shipping, "shipping")?;

    let row = NewOrder {
        user_id,
        order_number,
        subtotal: request.subtotal.unwrap_or_else(|| order_total(&items)),
        shipping_cost: request.shipping_cost.unwrap_or(0.0),
        total,
        items,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        shipping,
        updated_at: Utc::now(),
    };

    let session = state.store_session(&headers).await;
    let order: Order = session
        .client
        .from("orders")
        .insert(&row)
        .await
        .map_err(api_error)?;

    info!("created order {}", order.order_number);
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub order_id: Option<Uuid>,
    pub order_number: Option<String>,
    pub user_id: Option<Uuid>,
    pub items: Option<Vec<OrderItem>>,
    pub currency: Option<Currency>,
    pub customer_email: Option<String>,
}

/// Create a processor payment intent for an existing order and record a
/// payment row referencing it. Returns the client secret the browser
/// needs to complete the charge.
#[instrument(skip_all)]
pub async fn create_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreatePaymentRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let order_id = require(request.order_id, "order_id")?;
    let user_id = require(request.user_id, "user_id")?;
    let items = require(request.items, "items")?;
    if items.is_empty() {
        return Err(api_error(ApiError::InvalidRequest(
            "Payment has no items".to_string(),
        )));
    }

    let metadata = IntentMetadata::Checkout {
        order_id: order_id.to_string(),
        user_id: user_id.to_string(),
        customer_email: request.customer_email.clone(),
    };

    issue_intent_and_record(
        &state,
        &headers,
        &items,
        request.currency.unwrap_or_default(),
        metadata,
        request.customer_email,
        Some(order_id),
        request.order_number,
    )
    .await
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentIntentRequest {
    pub order_number: Option<String>,
    pub items: Option<Vec<OrderItem>>,
    pub currency: Option<Currency>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
}

/// Legacy intent endpoint kept for existing clients; same flow as
/// `create_payment` with the older metadata shape.
#[instrument(skip_all)]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let order_number = require_str(request.order_number, "order_number")?;
    let items = require(request.items, "items")?;
    if items.is_empty() {
        return Err(api_error(ApiError::InvalidRequest(
            "Payment has no items".to_string(),
        )));
    }

    let metadata = IntentMetadata::Legacy {
        order_number: order_number.clone(),
        customer_name: request.customer_name,
    };

    issue_intent_and_record(
        &state,
        &headers,
        &items,
        request.currency.unwrap_or_default(),
        metadata,
        request.customer_email,
        None,
        Some(order_number),
    )
    .await
}

/// Shared tail of both intent flows.
///
/// The amount sums the caller-supplied `price × quantity` (rounded to
/// minor units only at the processor boundary); the payment row stores
/// the pre-rounded total.
#[allow(clippy::too_many_arguments)]
async fn issue_intent_and_record(
    state: &AppState,
    headers: &HeaderMap,
    items: &[OrderItem],
    currency: Currency,
    metadata: IntentMetadata,
    receipt_email: Option<String>,
    order_id: Option<Uuid>,
    order_number: Option<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    let total = order_total(items);
    let amount_minor = currency.to_minor_units(total);

    let intent = state
        .stripe
        .create_intent(&CreateIntent {
            amount_minor,
            currency,
            metadata,
            receipt_email,
        })
        .await
        .map_err(api_error)?;

    let row = NewPayment {
        order_id,
        order_number,
        payment_intent_id: intent.id.clone(),
        amount: total,
        currency,
        status: PaymentStatus::Pending,
    };

    let session = state.store_session(headers).await;
    match session.client.from("payments").insert::<Payment, _>(&row).await {
        Ok(payment) => info!("recorded payment {} for intent {}", payment.id, intent.id),
        Err(e) => {
            // The intent already exists; the buyer must still be able to
            // pay. The gap is reconciled via the processor webhook.
            error!(
                "payment row for intent {} failed, returning client secret anyway: {e}",
                intent.id
            );
        }
    }

    Ok(Json(serde_json::json!({
        "client_secret": intent.client_secret,
        "payment_intent_id": intent.id,
        "amount": amount_minor,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CheckoutProfileRequest {
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
}

/// Persist the shipping/contact details captured during checkout onto
/// the buyer's profile
#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CheckoutProfileRequest>,
) -> HandlerResult<Json<Profile>> {
    let user_id = require_str(request.user_id, "user_id")?;

    let patch = super::profile::ProfileFieldsPatch {
        first_name: request.first_name,
        last_name: request.last_name,
        phone: request.phone,
        company_name: None,
        company_number: None,
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
