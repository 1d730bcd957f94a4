//! Dining Table Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dining table entity (桌台)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiningTable {
    pub table_id: String,
    pub number_of_guests: i64,
    pub table_number: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[validate(required)]
    pub number_of_guests: Option<i64>,
    #[validate(required)]
    pub table_number: Option<i64>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DiningTableUpdate {
    pub number_of_guests: Option<i64>,
    pub table_number: Option<i64>,
}
