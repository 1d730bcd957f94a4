//! Food Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Food entity (菜品)
///
/// `price` is normalized to two places on creation only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Food {
    pub food_id: String,
    pub name: String,
    pub price: f64,
    pub food_image: String,
    pub menu_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create food payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FoodCreate {
    #[validate(required, length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(required, range(min = 0.0, max = 1_000_000_000.0))]
    pub price: Option<f64>,
    #[validate(required)]
    pub food_image: Option<String>,
    #[validate(required)]
    pub menu_id: Option<String>,
}

/// Update food payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FoodUpdate {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0.0, max = 1_000_000_000.0))]
    pub price: Option<f64>,
    pub food_image: Option<String>,
    pub menu_id: Option<String>,
}
