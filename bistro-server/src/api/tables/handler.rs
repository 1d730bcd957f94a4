//! Dining Table API Handlers

use shared::error::ErrorCode;
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

use crate::AppResult;
use crate::api::crud::{self, CreateContext, Creatable, Resource, Updatable};
use crate::db::collections::TABLES;

pub struct Tables;

impl Resource for Tables {
    const RESOURCE: &'static str = "table";
    const COLLECTION: &'static str = TABLES;
    const ID_FIELD: &'static str = "table_id";
    const NOT_FOUND: ErrorCode = ErrorCode::TableNotFound;
    type Record = DiningTable;
}

impl Creatable for Tables {
    type Create = DiningTableCreate;

    fn build(payload: DiningTableCreate, ctx: &CreateContext) -> AppResult<DiningTable> {
        Ok(DiningTable {
            table_id: ctx.id.clone(),
            number_of_guests: crud::required(payload.number_of_guests, "number_of_guests")?,
            table_number: crud::required(payload.table_number, "table_number")?,
            created_at: ctx.now,
            updated_at: ctx.now,
        })
    }
}

impl Updatable for Tables {
    type Update = DiningTableUpdate;
}
