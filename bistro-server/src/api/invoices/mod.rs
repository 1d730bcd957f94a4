//! Invoice API 模块

mod handler;

pub use handler::Invoices;

use axum::{Router, routing::get};

use crate::api::crud;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/invoices", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(crud::list::<Invoices>).post(crud::create::<Invoices>),
        )
        .route(
            "/{id}",
            get(handler::get_view).patch(crud::update::<Invoices>),
        )
}
