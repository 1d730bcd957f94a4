//! Shared types for the bistro back office
//!
//! Error system, entity models with their validation rules, and small
//! utilities used by the server and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
