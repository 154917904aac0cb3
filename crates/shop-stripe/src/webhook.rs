//! # Webhook Verification
//!
//! Signature verification for processor webhook deliveries. Payment
//! status transitions are reconciled out-of-band; the API layer only
//! verifies and logs the events it receives.

use chrono::Utc;
use serde::Deserialize;
use shop_core::{ApiError, ApiResult};
use tracing::debug;

/// Events this service recognises
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventKind {
    PaymentSucceeded,
    PaymentFailed,
    Unknown(String),
}

/// A verified, parsed webhook event
#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub event_id: String,
    pub kind: WebhookEventKind,
    /// The processor's payment-intent id, when the event carries one
    pub payment_intent_id: Option<String>,
    pub raw: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: RawEventData,
}

#[derive(Debug, Deserialize)]
struct RawEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

/// Verify a webhook delivery against the signing secret and parse it.
///
/// Tolerance on the signed timestamp is five minutes.
pub fn verify_webhook(secret: &str, payload: &[u8], signature: &str) -> ApiResult<WebhookEvent> {
    let sig_parts = parse_signature_header(signature)?;

    let now = Utc::now().timestamp();
    let tolerance = 300;
    if (now - sig_parts.timestamp).abs() > tolerance {
        return Err(ApiError::WebhookVerificationFailed(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let signed_payload = format!(
        "{}.{}",
        sig_parts.timestamp,
        String::from_utf8_lossy(payload)
    );
    let expected_sig = compute_hmac_sha256(secret, &signed_payload);

    let valid = sig_parts
        .signatures
        .iter()
        .any(|sig| constant_time_compare(sig, &expected_sig));

    if !valid {
        return Err(ApiError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ));
    }

    let event: RawEvent = serde_json::from_slice(payload).map_err(|e| {
        ApiError::InvalidRequest(format!("Failed to parse webhook payload: {e}"))
    })?;

    debug!("verified webhook: type={}", event.event_type);

    let kind = match event.event_type.as_str() {
        "payment_intent.succeeded" => WebhookEventKind::PaymentSucceeded,
        "payment_intent.payment_failed" => WebhookEventKind::PaymentFailed,
        other => WebhookEventKind::Unknown(other.to_string()),
    };

    let payment_intent_id = event
        .data
        .object
        .get("id")
        .and_then(|v| v.as_str())
        .map(String::from);

    Ok(WebhookEvent {
        event_id: event.id,
        kind,
        payment_intent_id,
        raw: serde_json::Value::Object(event.data.object),
    })
}

struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> ApiResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            "v1" => signatures.push(value.to_string()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        ApiError::WebhookVerificationFailed("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(ApiError::WebhookVerificationFailed(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, timestamp: i64, payload: &str) -> String {
        let sig = compute_hmac_sha256(secret, &format!("{timestamp}.{payload}"));
        format!("t={timestamp},v1={sig}")
    }

    #[test]
    fn test_parse_signature_header() {
        let header = "t=1234567890,v1=abc123,v1=def456";
        let parsed = parse_signature_header(header).unwrap();

        assert_eq!(parsed.timestamp, 1234567890);
        assert_eq!(parsed.signatures.len(), 2);
    }

    #[test]
    fn test_verify_round_trip() {
        let secret = "whsec_test";
        let payload = serde_json::json!({
            "id": "evt_1",
            "type": "payment_intent.succeeded",
            "data": { "object": { "id": "pi_123" } }
        })
        .to_string();

        let header = sign(secret, Utc::now().timestamp(), &payload);
        let event = verify_webhook(secret, payload.as_bytes(), &header).unwrap();

        assert_eq!(event.kind, WebhookEventKind::PaymentSucceeded);
        assert_eq!(event.payment_intent_id.as_deref(), Some("pi_123"));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let secret = "whsec_test";
        let payload = "{}";
        let header = sign(secret, Utc::now().timestamp() - 3600, payload);

        let err = verify_webhook(secret, payload.as_bytes(), &header).unwrap_err();
        assert!(matches!(err, ApiError::WebhookVerificationFailed(_)));
    }

    #[test]
    fn test_signature_mismatch_rejected() {
        let payload = "{}";
        let header = sign("whsec_other", Utc::now().timestamp(), payload);

        let err = verify_webhook("whsec_test", payload.as_bytes(), &header).unwrap_err();
        assert!(matches!(err, ApiError::WebhookVerificationFailed(_)));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc123", "abc123"));
        assert!(!constant_time_compare("abc123", "abc124"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
