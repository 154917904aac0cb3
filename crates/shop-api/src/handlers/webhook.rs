//! Processor webhook endpoint.
//!
//! Verifies the delivery signature and logs the event. Payment status
//! transitions themselves are reconciled out-of-band.

use crate::handlers::{api_error, ErrorResponse, HandlerError};
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use shop_core::ApiError;
use shop_stripe::{verify_webhook, WebhookEventKind};
use tracing::{info, instrument, warn};

#[instrument(skip_all)]
pub async fn stripe(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, HandlerError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            api_error(ApiError::InvalidRequest(
                "Missing Stripe-Signature header".to_string(),
            ))
        })?;

    let Some(ref secret) = state.stripe.config().webhook_secret else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Webhook not configured".to_string(),
            }),
        ));
    };

    let event = verify_webhook(secret, &body, signature).map_err(api_error)?;

    match event.kind {
        WebhookEventKind::PaymentSucceeded => info!(
            "payment succeeded: intent={:?}",
            event.payment_intent_id
        ),
        WebhookEventKind::PaymentFailed => warn!(
            "payment failed: intent={:?}",
            event.payment_intent_id
        ),
        WebhookEventKind::Unknown(ref kind) => {
            info!("ignoring webhook event {kind} ({})", event.event_id)
        }
    }

    Ok(StatusCode::OK)
}
