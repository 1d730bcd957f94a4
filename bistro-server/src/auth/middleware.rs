//! 认证中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::HeaderMap;

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// Header carrying the raw token, as older clients send it
pub const TOKEN_HEADER: &str = "token";

/// Routes reachable without a token
const PUBLIC_ROUTES: &[&str] = &["/users/login", "/users/signup", "/health"];

/// 认证中间件
///
/// 令牌来源 (依次尝试):
/// - `token: <jwt>`
/// - `Authorization: Bearer <jwt>`
///
/// 验证成功后将 [`CurrentUser`] 注入请求扩展，并复制到响应扩展供访问日志读取。
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无令牌 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 / 刷新令牌 | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS || PUBLIC_ROUTES.contains(&req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let user = authenticate(req.headers(), req.uri(), state.jwt_service())?;
    req.extensions_mut().insert(user.clone());
    let mut response = next.run(req).await;
    response.extensions_mut().insert(user);
    Ok(response)
}

/// Resolve the caller from request headers
pub(crate) fn authenticate(
    headers: &HeaderMap,
    uri: &http::Uri,
    jwt: &JwtService,
) -> Result<CurrentUser, AppError> {
    let token = match extract_token(headers) {
        Some(token) => token,
        None => {
            security_log!("WARN", "auth_missing", uri = uri.to_string());
            return Err(AppError::unauthorized());
        }
    };

    match jwt.verify(token) {
        Ok(claims) if claims.is_access() => Ok(CurrentUser::from(claims)),
        Ok(claims) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = "refresh token used for access",
                user_id = claims.uid,
                uri = uri.to_string()
            );
            Err(AppError::invalid_token("Invalid token"))
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = e.to_string(),
                uri = uri.to_string()
            );
            Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                other => other.into(),
            })
        }
    }
}

fn extract_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(raw) = headers.get(TOKEN_HEADER).and_then(|h| h.to_str().ok()) {
        let raw = raw.trim();
        if !raw.is_empty() {
            return Some(raw);
        }
    }

    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
}
