//! User API 模块
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /users/signup | POST | 注册 | 无 |
//! | /users/login | POST | 登录 | 无 |
//! | /users | GET | 分页获取用户 | 需要 |
//! | /users/{id} | GET | 获取单个用户 | 需要 |

mod handler;

pub use handler::Users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::crud;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/signup", post(handler::signup))
        .route("/login", post(handler::login))
        .route("/{id}", get(crud::get_by_id::<Users>))
}
