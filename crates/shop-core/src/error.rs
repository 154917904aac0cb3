//! # API Error Types
//!
//! Typed error handling shared across the storefront crates.
//! All fallible operations return `Result<T, ApiError>`.

use thiserror::Error;

/// Core error type for all storefront operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller-required field was absent from the request
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid request data beyond a simple missing field
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A single-row lookup matched zero rows
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// No valid session where one is required
    #[error("Not authenticated")]
    Unauthorized,

    /// The store rejected the query or write; carries the store's message text
    #[error("{message}")]
    StoreRejected { message: String },

    /// Credential mismatch during login, remapped to a fixed user-facing message
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Payment processor API error
    #[error("Payment error: {message}")]
    Processor { message: String },

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Network/HTTP error reaching the store or the processor.
    /// Details go to the server log, never to the response body.
    #[error("Internal server error")]
    Upstream {
        #[source]
        source: reqwest_error::Boxed,
    },

    /// Anything else unexpected
    #[error("Internal server error")]
    Internal(String),
}

/// Keeps `reqwest` out of this crate's dependency tree while still letting
/// client crates attach the transport error as a source.
pub mod reqwest_error {
    pub type Boxed = Box<dyn std::error::Error + Send + Sync + 'static>;
}

impl ApiError {
    /// Shorthand for a missing request field
    pub fn missing(field: impl Into<String>) -> Self {
        ApiError::MissingField {
            field: field.into(),
        }
    }

    /// Shorthand for a not-found resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound {
            resource: resource.into(),
        }
    }

    /// Wrap a transport-level failure
    pub fn upstream(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        ApiError::Upstream {
            source: Box::new(source),
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Config(_) => 500,
            ApiError::MissingField { .. } => 400,
            ApiError::InvalidRequest(_) => 400,
            ApiError::NotFound { .. } => 404,
            ApiError::Unauthorized => 401,
            ApiError::StoreRejected { .. } => 400,
            ApiError::InvalidCredentials => 401,
            ApiError::Processor { .. } => 400,
            ApiError::WebhookVerificationFailed(_) => 401,
            ApiError::Upstream { .. } => 500,
            ApiError::Internal(_) => 500,
        }
    }

    /// The message safe to place in a response body.
    ///
    /// Upstream and internal failures collapse to a fixed string; their
    /// details are only written to the server-side log.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Upstream { .. } | ApiError::Internal(_) | ApiError::Config(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for storefront operations
pub type ApiResult<T> = Result<T, ApiError>;
