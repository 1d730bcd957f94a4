//! Invoice Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::OrderItemLine;

/// 支付方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Card,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "CARD",
            Self::Cash => "CASH",
        }
    }
}

/// 支付状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// Invoice entity (账单)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    pub invoice_id: String,
    pub order_id: String,
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
    /// Creation time of the referenced order plus one day
    pub payment_due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create invoice payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InvoiceCreate {
    #[validate(required)]
    pub order_id: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    #[validate(required)]
    pub payment_status: Option<PaymentStatus>,
}

/// Update invoice payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct InvoiceUpdate {
    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<PaymentStatus>,
}

/// Invoice joined with its order's aggregated lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceView {
    pub invoice_id: String,
    pub order_id: String,
    /// `"CARD"`, `"CASH"`, or the literal `"null"` when no method was recorded
    pub payment_method: String,
    pub payment_status: Option<PaymentStatus>,
    pub payment_due: f64,
    pub payment_due_date: DateTime<Utc>,
    pub table_number: Option<i64>,
    pub order_details: Vec<OrderItemLine>,
}
