//! Error system shared by the server and its clients
//!
//! - [`ErrorCode`]: numeric error codes
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: error with code, message and details
//! - [`ApiResponse`]: response body
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "email");
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//!
//! let response = ApiResponse::error(&err);
//! assert_eq!(response.code, 2);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
