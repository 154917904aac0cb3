//! # Payment Intents
//!
//! Payment-intent creation against the processor's REST API. The
//! browser completes the charge directly with the processor using the
//! returned client secret; this service only creates the intent and
//! records a local row.

use crate::config::StripeConfig;
use serde::Deserialize;
use shop_core::{ApiError, ApiResult, Currency};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Metadata attached to a payment intent.
///
/// The original system grew two near-duplicate intent flows with
/// different metadata shapes; both are kept as accepted variants of one
/// configurable flow.
#[derive(Debug, Clone)]
pub enum IntentMetadata {
    /// Shape used by the checkout flow
    Checkout {
        order_id: String,
        user_id: String,
        customer_email: Option<String>,
    },
    /// Shape used by the standalone intent endpoint
    Legacy {
        order_number: String,
        customer_name: Option<String>,
    },
}

impl IntentMetadata {
    /// Render to flat `metadata[...]` form fields
    fn form_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        match self {
            IntentMetadata::Checkout {
                order_id,
                user_id,
                customer_email,
            } => {
                params.push(("metadata[order_id]".to_string(), order_id.clone()));
                params.push(("metadata[user_id]".to_string(), user_id.clone()));
                if let Some(email) = customer_email {
                    params.push(("metadata[customer_email]".to_string(), email.clone()));
                }
            }
            IntentMetadata::Legacy {
                order_number,
                customer_name,
            } => {
                params.push(("metadata[order_number]".to_string(), order_number.clone()));
                if let Some(name) = customer_name {
                    params.push(("metadata[customer_name]".to_string(), name.clone()));
                }
            }
        }
        params
    }
}

/// An intent creation request
#[derive(Debug, Clone)]
pub struct CreateIntent {
    /// Amount in the currency's minor units, already rounded
    pub amount_minor: i64,
    pub currency: Currency,
    pub metadata: IntentMetadata,
    /// Receipt email for the processor to send to
    pub receipt_email: Option<String>,
}

/// The processor's intent, as much of it as this service needs
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

/// Client for the processor's payment-intent endpoint
#[derive(Clone)]
pub struct PaymentIntentClient {
    config: StripeConfig,
    client: reqwest::Client,
}

impl PaymentIntentClient {
    /// Create a new intent client
    pub fn new(config: StripeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> ApiResult<Self> {
        Ok(Self::new(StripeConfig::from_env()?))
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Create a payment intent and return its id and client secret.
    #[instrument(skip(self, request), fields(amount = request.amount_minor))]
    pub async fn create_intent(&self, request: &CreateIntent) -> ApiResult<PaymentIntent> {
        if request.amount_minor <= 0 {
            return Err(ApiError::InvalidRequest(
                "Payment amount must be positive".to_string(),
            ));
        }

        let mut form_params: Vec<(String, String)> = vec![
            ("amount".to_string(), request.amount_minor.to_string()),
            ("currency".to_string(), request.currency.as_str().to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];

        if let Some(ref email) = request.receipt_email {
            form_params.push(("receipt_email".to_string(), email.clone()));
        }

        form_params.extend(request.metadata.form_params());

        debug!("creating payment intent: {} {}", request.amount_minor, request.currency);

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);
        let idempotency_key = Uuid::new_v4().to_string();

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .header("Idempotency-Key", &idempotency_key)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| {
                error!("processor unreachable: {e}");
                ApiError::upstream(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::upstream)?;

        if !status.is_success() {
            error!("processor error: status={status}, body={body}");

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(ApiError::Processor {
                    message: error_response.error.message,
                });
            }

            return Err(ApiError::Processor {
                message: format!("HTTP {status}"),
            });
        }

        let intent: PaymentIntent = serde_json::from_str(&body)
            .map_err(|e| ApiError::Internal(format!("malformed processor response: {e}")))?;

        info!("created payment intent: id={}", intent.id);

        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> PaymentIntentClient {
        PaymentIntentClient::new(
            StripeConfig::new("sk_test_abc").with_api_base_url(server.uri()),
        )
    }

    fn checkout_request(amount_minor: i64) -> CreateIntent {
        CreateIntent {
            amount_minor,
            currency: Currency::USD,
            metadata: IntentMetadata::Checkout {
                order_id: "ord-1".into(),
                user_id: "user-1".into(),
                customer_email: Some("buyer@example.com".into()),
            },
            receipt_email: Some("buyer@example.com".into()),
        }
    }

    #[tokio::test]
    async fn test_create_intent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(header("Authorization", "Bearer sk_test_abc"))
            .and(body_string_contains("amount=3697"))
            .and(body_string_contains("currency=usd"))
            .and(body_string_contains("metadata%5Border_id%5D=ord-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pi_123",
                "client_secret": "pi_123_secret_456",
                "amount": 3697,
                "currency": "usd",
                "status": "requires_payment_method"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let intent = client_for(&server)
            .create_intent(&checkout_request(3697))
            .await
            .unwrap();

        assert_eq!(intent.id, "pi_123");
        assert_eq!(intent.client_secret, "pi_123_secret_456");
    }

    #[tokio::test]
    async fn test_processor_error_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "error": { "message": "Your card was declined." }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_intent(&checkout_request(100))
            .await
            .unwrap_err();

        match err {
            ApiError::Processor { message } => assert_eq!(message, "Your card was declined."),
            other => panic!("expected Processor error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_amount_rejected_before_any_call() {
        let server = MockServer::start().await;
        // No mock mounted: a request reaching the server would 404 and
        // surface as a processor error instead of InvalidRequest.

        let err = client_for(&server)
            .create_intent(&checkout_request(0))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn test_legacy_metadata_shape() {
        let metadata = IntentMetadata::Legacy {
            order_number: "ORD-1001".into(),
            customer_name: Some("Ada".into()),
        };
        let params = metadata.form_params();
        assert!(params.contains(&("metadata[order_number]".to_string(), "ORD-1001".to_string())));
        assert!(params.contains(&("metadata[customer_name]".to_string(), "Ada".to_string())));
    }
}
