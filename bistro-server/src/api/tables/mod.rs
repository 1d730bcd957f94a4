//! Dining Table API 模块

mod handler;

pub use handler::Tables;

use axum::{Router, routing::get};

use crate::api::crud;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/tables", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(crud::list::<Tables>).post(crud::create::<Tables>))
        .route(
            "/{id}",
            get(crud::get_by_id::<Tables>).patch(crud::update::<Tables>),
        )
}
