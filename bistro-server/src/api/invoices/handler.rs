//! Invoice API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Duration;
use shared::error::ErrorCode;
use shared::models::{Invoice, InvoiceCreate, InvoiceUpdate, InvoiceView, Order};

use crate::AppResult;
use crate::api::crud::{self, CreateContext, Creatable, Reference, Resource, Updatable};
use crate::api::orders::Orders;
use crate::core::ServerState;
use crate::db::collections::INVOICES;
use crate::orders::compose_invoice;

/// 账单到期时间 = 订单创建时间 + 1 天
const PAYMENT_TERM_DAYS: i64 = 1;

pub struct Invoices;

impl Resource for Invoices {
    const RESOURCE: &'static str = "invoice";
    const COLLECTION: &'static str = INVOICES;
    const ID_FIELD: &'static str = "invoice_id";
    const NOT_FOUND: ErrorCode = ErrorCode::InvoiceNotFound;
    type Record = Invoice;
}

impl Creatable for Invoices {
    type Create = InvoiceCreate;

    fn create_references(payload: &InvoiceCreate) -> Vec<Reference> {
        payload
            .order_id
            .iter()
            .map(|id| Reference::to::<Orders>(id.clone()))
            .collect()
    }

    fn build(payload: InvoiceCreate, ctx: &CreateContext) -> AppResult<Invoice> {
        let order: Order = ctx.reference(Orders::COLLECTION)?;
        Ok(Invoice {
            invoice_id: ctx.id.clone(),
            order_id: crud::required(payload.order_id, "order_id")?,
            payment_method: payload.payment_method,
            payment_status: Some(crud::required(payload.payment_status, "payment_status")?),
            payment_due_date: order.created_at + Duration::days(PAYMENT_TERM_DAYS),
            created_at: ctx.now,
            updated_at: ctx.now,
        })
    }
}

impl Updatable for Invoices {
    type Update = InvoiceUpdate;
}

/// GET /invoices/{id} - 账单视图 (含订单聚合明细)
pub async fn get_view(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<InvoiceView>> {
    Ok(Json(compose_invoice(state.store(), &id).await?))
}
