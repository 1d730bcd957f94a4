//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the HTTP status code for this error code
    ///
    /// Dangling references and rejected logins are server errors, matching how
    /// existing clients of this API already classify them.
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound
            | Self::OrderNotFound
            | Self::OrderEmpty
            | Self::OrderItemNotFound
            | Self::InvoiceNotFound
            | Self::FoodNotFound
            | Self::MenuNotFound
            | Self::TableNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 500 Internal Server Error
            Self::InvalidCredentials
            | Self::InternalError
            | Self::DatabaseError
            | Self::TimeoutError
            | Self::ConfigError
            | Self::DanglingReference => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation, malformed input, duplicates)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::MenuWindowInvalid
            | Self::UserEmailOrPhoneExists => StatusCode::BAD_REQUEST,
        }
    }
}
