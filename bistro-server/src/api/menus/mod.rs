//! Menu API 模块

mod handler;

pub use handler::Menus;

use axum::{Router, routing::get};

use crate::api::crud;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/menus", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(crud::list::<Menus>).post(crud::create::<Menus>))
        .route(
            "/{id}",
            get(crud::get_by_id::<Menus>).patch(crud::update::<Menus>),
        )
}
