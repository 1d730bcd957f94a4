//! Request extractors
//!
//! - [`CurrentUser`] straight from a handler signature
//! - [`ValidJson`] for bodies that must also pass `validator` rules

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::AppError;
use crate::auth::CurrentUser;
use crate::auth::middleware::authenticate;
use crate::core::ServerState;

/// Uses the user injected by [`require_auth`](super::require_auth) when present,
/// otherwise authenticates the request itself.
impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user = authenticate(&parts.headers, &parts.uri, state.jwt_service())?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// JSON body that has passed its `validator` rules
///
/// A body that does not parse is rejected as `InvalidRequest`; one that parses
/// but breaks a rule is rejected as `ValidationFailed` with per-field details.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::invalid_request(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}
