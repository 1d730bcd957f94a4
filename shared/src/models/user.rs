//! User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stored user record
///
/// `password` holds the argon2 PHC string. Never return this type from an
/// endpoint; convert to [`UserView`] first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub avatar: Option<String>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned to clients (no password hash)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserView {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub avatar: Option<String>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            avatar: user.avatar,
            token: user.token,
            refresh_token: user.refresh_token,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Signup payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(required, length(min = 2, max = 100))]
    pub first_name: Option<String>,
    #[validate(required, length(min = 2, max = 100))]
    pub last_name: Option<String>,
    #[validate(required, length(min = 6))]
    pub password: Option<String>,
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(required)]
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required)]
    pub email: Option<String>,
    #[validate(required)]
    pub password: Option<String>,
}
