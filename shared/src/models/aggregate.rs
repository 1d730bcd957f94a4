//! Aggregated order views

use serde::{Deserialize, Serialize};

/// One order item joined with its food, order and table
///
/// Every joined field is `None` when the join found nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderItemLine {
    pub amount: Option<f64>,
    pub food_name: Option<String>,
    pub food_image: Option<String>,
    pub table_number: Option<i64>,
    pub table_id: Option<String>,
    pub order_id: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

/// All lines of one order, grouped by (order, table, table number)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderGroup {
    pub order_id: Option<String>,
    pub table_id: Option<String>,
    pub table_number: Option<i64>,
    /// Sum of `food.price` over the lines; quantity is not applied
    pub payment_due: f64,
    pub total_count: u64,
    pub order_items: Vec<OrderItemLine>,
}
