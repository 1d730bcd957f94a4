use std::time::Instant;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppError;
use crate::auth::{CurrentUser, require_auth};
use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP 请求日志中间件
///
/// 每个请求一条 `http_access` 日志：请求 ID (x-request-id，缺失时生成)、
/// 方法、URI、状态码、耗时与认证用户。请求 ID 回写到响应头。
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let started = Instant::now();
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let method = request.method().clone();
    let uri = request.uri().clone();

    let mut response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let user_id = response
        .extensions()
        .get::<CurrentUser>()
        .map(|user| user.id.clone())
        .unwrap_or_else(|| "-".to_string());

    if status.is_server_error() {
        tracing::warn!(
            target: "http_access",
            request_id = %request_id,
            elapsed_ms,
            user_id = %user_id,
            "{} {} {}",
            method,
            uri,
            status
        );
    } else {
        tracing::info!(
            target: "http_access",
            request_id = %request_id,
            elapsed_ms,
            user_id = %user_id,
            "{} {} {}",
            method,
            uri,
            status
        );
    }

    if let Ok(value) = http::HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

async fn fallback() -> AppError {
    AppError::not_found("route")
}

/// Build the Axum router (without state)
pub fn build_routes() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::users::router())
        .merge(crate::api::foods::router())
        .merge(crate::api::menus::router())
        .merge(crate::api::tables::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::order_items::router())
        .merge(crate::api::invoices::router())
        .fallback(fallback)
}

/// Build the complete application
///
/// 认证中间件只包裹已匹配的路由 (route_layer)，require_auth 内部会跳过公共路由；
/// 未知路由直接落到 fallback 返回 404。
pub fn build_app(state: ServerState) -> Router {
    build_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}
