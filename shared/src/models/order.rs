//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order entity (订单)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub order_id: String,
    pub table_id: String,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    #[validate(required)]
    pub table_id: Option<String>,
    #[validate(required)]
    pub order_date: Option<DateTime<Utc>>,
}

/// Update order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderUpdate {
    pub table_id: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
}
