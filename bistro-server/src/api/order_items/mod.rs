//! Order Item API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /order-items | GET | 全部订单明细 |
//! | /order-items | POST | 为桌台下单 (订单 + 明细) |
//! | /order-items/{id} | GET / PATCH | 单条明细 |
//! | /order-items/order/{order_id} | GET | 订单聚合视图 |

mod handler;

pub use handler::OrderItems;

use axum::{Router, routing::get};

use crate::api::crud;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/order-items", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(crud::list::<OrderItems>).post(handler::create_batch),
        )
        .route(
            "/{id}",
            get(crud::get_by_id::<OrderItems>).patch(crud::update::<OrderItems>),
        )
        .route("/order/{order_id}", get(handler::list_by_order))
}
