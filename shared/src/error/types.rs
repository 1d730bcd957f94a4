//! Error types and API response structures

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Malformed request body or query
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// A record named by id in the payload does not exist
    ///
    /// The message keeps the lowercase `"<resource> not found"` wording clients match on.
    pub fn dangling_reference(resource: impl Into<String>, id: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::DanglingReference, format!("{} not found", r))
            .with_detail("resource", r)
            .with_detail("id", id.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TimeoutError, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }
}

/// Field-level validation failures become a single `ValidationFailed` error.
///
/// `details.fields` maps every failing field to the list of rule codes it broke.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = serde_json::Map::new();
        for (field, kind) in errors.errors() {
            let rules: Vec<Value> = match kind {
                validator::ValidationErrorsKind::Field(list) => list
                    .iter()
                    .map(|e| Value::String(e.code.to_string()))
                    .collect(),
                validator::ValidationErrorsKind::Struct(_)
                | validator::ValidationErrorsKind::List(_) => {
                    vec![Value::String("nested".to_string())]
                }
            };
            fields.insert(field.to_string(), Value::Array(rules));
        }

        let mut names: Vec<&String> = fields.keys().collect();
        names.sort();
        let message = format!(
            "Validation failed: {}",
            names
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self::validation(message).with_detail("fields", Value::Object(fields))
    }
}

/// Error response body
///
/// Successful handlers return their payload as bare JSON; only failures use this shape.
/// - `code`: numeric error code
/// - `message`: human-readable message
/// - `details`: additional error details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::error(&self);

        if matches!(self.code.category(), ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 2))]
        name: String,
        #[validate(required)]
        price: Option<f64>,
    }

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "email")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "email");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_dangling_reference() {
        let err = AppError::dangling_reference("menu", "m-1");
        assert_eq!(err.code, ErrorCode::DanglingReference);
        assert_eq!(err.message, "menu not found");
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.details.unwrap().get("id").unwrap(), "m-1");
    }

    #[test]
    fn test_from_validation_errors() {
        let probe = Probe {
            name: "x".to_string(),
            price: None,
        };
        let err: AppError = probe.validate().unwrap_err().into();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Validation failed: name, price");
        let details = err.details.unwrap();
        let fields = details.get("fields").unwrap();
        assert_eq!(fields["name"][0], "length");
        assert_eq!(fields["price"][0], "required");
    }

    #[test]
    fn test_api_response_error() {
        let err = AppError::with_message(ErrorCode::NotFound, "food not found")
            .with_detail("id", "123");
        let response = ApiResponse::error(&err);

        assert_eq!(response.code, 3);
        assert_eq!(response.message, "food not found");
        assert!(response.details.is_some());

        let plain = ApiResponse::error(&AppError::unauthorized());
        let json = serde_json::to_string(&plain).unwrap();
        assert!(!json.contains("\"details\""));
        assert!(json.contains("\"code\":1001"));
    }
}
