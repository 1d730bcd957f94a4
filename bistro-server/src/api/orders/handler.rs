//! Order API Handlers

use shared::error::ErrorCode;
use shared::models::{Order, OrderCreate, OrderUpdate};

use crate::AppResult;
use crate::api::crud::{self, CreateContext, Creatable, Reference, Resource, Updatable};
use crate::api::tables::Tables;
use crate::db::collections::ORDERS;

pub struct Orders;

impl Resource for Orders {
    const RESOURCE: &'static str = "order";
    const COLLECTION: &'static str = ORDERS;
    const ID_FIELD: &'static str = "order_id";
    const NOT_FOUND: ErrorCode = ErrorCode::OrderNotFound;
    type Record = Order;
}

impl Creatable for Orders {
    type Create = OrderCreate;

    fn create_references(payload: &OrderCreate) -> Vec<Reference> {
        payload
            .table_id
            .iter()
            .map(|id| Reference::to::<Tables>(id.clone()))
            .collect()
    }

    fn build(payload: OrderCreate, ctx: &CreateContext) -> AppResult<Order> {
        Ok(Order {
            order_id: ctx.id.clone(),
            table_id: crud::required(payload.table_id, "table_id")?,
            order_date: crud::required(payload.order_date, "order_date")?,
            created_at: ctx.now,
            updated_at: ctx.now,
        })
    }
}

impl Updatable for Orders {
    type Update = OrderUpdate;

    fn update_references(payload: &OrderUpdate) -> Vec<Reference> {
        payload
            .table_id
            .iter()
            .map(|id| Reference::to::<Tables>(id.clone()))
            .collect()
    }
}
