//! Food API 模块

mod handler;

pub use handler::Foods;

use axum::{Router, routing::get};

use crate::api::crud;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/foods", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(crud::create::<Foods>))
        .route(
            "/{id}",
            get(crud::get_by_id::<Foods>).patch(crud::update::<Foods>),
        )
}
