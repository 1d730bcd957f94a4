//! Invoice view
//!
//! An invoice carries only payment facts; the amounts and lines come from the
//! aggregation of its order.

use shared::error::ErrorCode;
use shared::models::{Invoice, InvoiceView, OrderGroup};

use super::aggregation::aggregate_orders;
use crate::db::collections::INVOICES;
use crate::db::{Filter, Store};
use crate::{AppError, AppResult};

/// Written in place of a missing payment method
const NO_PAYMENT_METHOD: &str = "null";

/// Load an invoice and merge it with the first aggregation group of its order
///
/// An order without items yields no group and is reported as
/// [`ErrorCode::OrderEmpty`].
pub async fn compose_invoice(store: &Store, invoice_id: &str) -> AppResult<InvoiceView> {
    let invoice: Invoice = store
        .find_one_as(INVOICES, &Filter::eq("invoice_id", invoice_id))
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::InvoiceNotFound).with_detail("invoice_id", invoice_id)
        })?;

    let group = aggregate_orders(store, Some(&invoice.order_id))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| {
            AppError::new(ErrorCode::OrderEmpty).with_detail("order_id", invoice.order_id.clone())
        })?;

    Ok(merge(invoice, group))
}

fn merge(invoice: Invoice, group: OrderGroup) -> InvoiceView {
    InvoiceView {
        invoice_id: invoice.invoice_id,
        order_id: invoice.order_id,
        payment_method: invoice
            .payment_method
            .map(|method| method.as_str().to_string())
            .unwrap_or_else(|| NO_PAYMENT_METHOD.to_string()),
        payment_status: invoice.payment_status,
        payment_due: group.payment_due,
        payment_due_date: invoice.payment_due_date,
        table_number: group.table_number,
        order_details: group.order_items,
    }
}
