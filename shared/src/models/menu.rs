//! Menu Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu entity (菜单)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Menu {
    pub menu_id: String,
    pub name: String,
    pub category: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create menu payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuCreate {
    #[validate(required)]
    pub name: Option<String>,
    #[validate(required)]
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Update menu payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MenuUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl MenuUpdate {
    /// The proposed active window, when both ends are supplied
    pub fn window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

/// Accepts a window only when it opens strictly in the future and closes after it opens.
///
/// An already-open window is rejected even if `now` lies inside it.
pub fn is_window_acceptable(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    start > now && end > start
}
