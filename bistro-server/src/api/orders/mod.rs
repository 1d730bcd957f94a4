//! Order API 模块

mod handler;

pub use handler::Orders;

use axum::{Router, routing::get};

use crate::api::crud;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(crud::list::<Orders>).post(crud::create::<Orders>))
        .route(
            "/{id}",
            get(crud::get_by_id::<Orders>).patch(crud::update::<Orders>),
        )
}
