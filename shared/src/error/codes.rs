//! Error codes shared by the server and its clients
//!
//! Codes are grouped by thousands:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order, order item and invoice errors
//! - 6xxx: Menu and food errors
//! - 7xxx: Table errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code enum
///
/// Serialized as its `u16` value so clients in any language can match on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request (malformed body, bad query)
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// No token presented
    NotAuthenticated = 1001,
    /// Email or password is incorrect
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no aggregated items
    OrderEmpty = 4002,
    /// Order item not found
    OrderItemNotFound = 4101,
    /// Invoice not found
    InvoiceNotFound = 4201,

    // ==================== 6xxx: Menu ====================
    /// Food not found
    FoodNotFound = 6001,
    /// Menu not found
    MenuNotFound = 6101,
    /// Menu active window rejected
    MenuWindowInvalid = 6102,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Email or phone already registered
    UserEmailOrPhoneExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Store operation exceeded its time budget
    TimeoutError = 9003,
    /// Configuration error
    ConfigError = 9004,
    /// A referenced record does not exist
    DanglingReference = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default English message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",

            ErrorCode::NotAuthenticated => "No authorization header provided",
            ErrorCode::InvalidCredentials => "email or password is incorrect",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",

            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::InvoiceNotFound => "Invoice not found",

            ErrorCode::FoodNotFound => "Food not found",
            ErrorCode::MenuNotFound => "Menu not found",
            ErrorCode::MenuWindowInvalid => "kindly retype the time",

            ErrorCode::TableNotFound => "Table not found",

            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UserEmailOrPhoneExists => "this email or phone number already exists",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::DanglingReference => "Referenced record not found",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4101 => Ok(ErrorCode::OrderItemNotFound),
            4201 => Ok(ErrorCode::InvoiceNotFound),

            6001 => Ok(ErrorCode::FoodNotFound),
            6101 => Ok(ErrorCode::MenuNotFound),
            6102 => Ok(ErrorCode::MenuWindowInvalid),

            7001 => Ok(ErrorCode::TableNotFound),

            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UserEmailOrPhoneExists),

            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::TimeoutError),
            9004 => Ok(ErrorCode::ConfigError),
            9005 => Ok(ErrorCode::DanglingReference),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::OrderEmpty.code(), 4002);
        assert_eq!(ErrorCode::MenuNotFound.code(), 6101);
        assert_eq!(ErrorCode::UserEmailOrPhoneExists.code(), 8002);
        assert_eq!(ErrorCode::DanglingReference.code(), 9005);
    }

    #[test]
    fn test_try_from_every_variant() {
        let all = [
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::InvalidRequest,
            ErrorCode::NotAuthenticated,
            ErrorCode::InvalidCredentials,
            ErrorCode::TokenExpired,
            ErrorCode::TokenInvalid,
            ErrorCode::OrderNotFound,
            ErrorCode::OrderEmpty,
            ErrorCode::OrderItemNotFound,
            ErrorCode::InvoiceNotFound,
            ErrorCode::FoodNotFound,
            ErrorCode::MenuNotFound,
            ErrorCode::MenuWindowInvalid,
            ErrorCode::TableNotFound,
            ErrorCode::UserNotFound,
            ErrorCode::UserEmailOrPhoneExists,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::TimeoutError,
            ErrorCode::ConfigError,
            ErrorCode::DanglingReference,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(9999), Err(InvalidErrorCode(9999)));
        assert_eq!(
            InvalidErrorCode(42).to_string(),
            "invalid error code: 42"
        );
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableNotFound).unwrap();
        assert_eq!(json, "7001");

        let code: ErrorCode = serde_json::from_str("1003").unwrap();
        assert_eq!(code, ErrorCode::TokenExpired);

        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(
            ErrorCode::InvalidCredentials.message(),
            "email or password is incorrect"
        );
        assert_eq!(ErrorCode::MenuWindowInvalid.message(), "kindly retype the time");
    }
}
