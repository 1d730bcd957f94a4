//! Order Item Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Order;

/// Order line (订单明细), owned by exactly one [`Order`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItem {
    pub order_item_id: String,
    pub order_id: String,
    pub food_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of a batch submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemDraft {
    #[validate(required)]
    pub food_id: Option<String>,
    #[validate(required, range(min = 1))]
    pub quantity: Option<i64>,
    #[validate(required, range(min = 0.0, max = 1_000_000_000.0))]
    pub unit_price: Option<f64>,
}

/// Batch submission: creates the order for `table_id` and all of its lines
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemBatch {
    #[validate(required)]
    pub table_id: Option<String>,
    #[validate(length(min = 1), nested)]
    pub order_items: Vec<OrderItemDraft>,
}

/// Batch creation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemBatchCreated {
    pub order: Order,
    pub order_items: Vec<OrderItem>,
}

/// Update order item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderItemUpdate {
    pub food_id: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: Option<i64>,
    #[validate(range(min = 0.0, max = 1_000_000_000.0))]
    pub unit_price: Option<f64>,
}
