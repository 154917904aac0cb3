//! Contact-form enquiries, optionally referencing a product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free-form enquiry row.
///
/// The admin read side embeds the referenced product's name and slug via
/// the store's relational select; `product` stays `None` on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: Uuid,

    pub name: String,

    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Uuid>,

    /// Joined product summary, present only on admin reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<EnquiryProduct>,

    pub created_at: DateTime<Utc>,
}

/// The joined slice of a product an enquiry refers to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnquiryProduct {
    pub name: String,
    pub slug: String,
}

/// Insert payload for a new enquiry
#[derive(Debug, Clone, Serialize)]
pub struct NewEnquiry {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Uuid>,
}
