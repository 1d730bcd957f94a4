//! Order Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::ErrorCode;
use shared::models::{
    Order, OrderGroup, OrderItem, OrderItemBatch, OrderItemBatchCreated, OrderItemDraft,
    OrderItemUpdate,
};
use shared::util::{new_record_id, normalize_price, now_seconds};

use crate::AppResult;
use crate::api::crud::{self, Reference, Resource, Updatable};
use crate::api::orders::Orders;
use crate::api::tables::Tables;
use crate::auth::CurrentUser;
use crate::auth::extractor::ValidJson;
use crate::core::ServerState;
use crate::db::collections::ORDER_ITEMS;
use crate::db::to_document;
use crate::orders::aggregate_orders;

pub struct OrderItems;

impl Resource for OrderItems {
    const RESOURCE: &'static str = "order item";
    const COLLECTION: &'static str = ORDER_ITEMS;
    const ID_FIELD: &'static str = "order_item_id";
    const NOT_FOUND: ErrorCode = ErrorCode::OrderItemNotFound;
    type Record = OrderItem;
}

/// Unit price is stored as sent; only batch creation rounds it.
impl Updatable for OrderItems {
    type Update = OrderItemUpdate;
}

fn build_item(draft: OrderItemDraft, order: &Order) -> AppResult<OrderItem> {
    Ok(OrderItem {
        order_item_id: new_record_id(),
        order_id: order.order_id.clone(),
        food_id: crud::required(draft.food_id, "food_id")?,
        quantity: crud::required(draft.quantity, "quantity")?,
        unit_price: normalize_price(
            crud::required(draft.unit_price, "unit_price")?,
            "unit_price",
        )?,
        created_at: order.created_at,
        updated_at: order.created_at,
    })
}

/// POST /order-items - 下单
///
/// 先写订单，再一次性写入全部明细。两次写入不在同一事务中：
/// 第二次写入失败时订单保留 (无明细)。
pub async fn create_batch(
    State(state): State<ServerState>,
    user: CurrentUser,
    ValidJson(batch): ValidJson<OrderItemBatch>,
) -> AppResult<Json<OrderItemBatchCreated>> {
    let store = state.store();

    let table_id = crud::required(batch.table_id, "table_id")?;
    crud::resolve_references(store, vec![Reference::to::<Tables>(table_id.clone())]).await?;

    let now = now_seconds();
    let order = Order {
        order_id: new_record_id(),
        table_id,
        order_date: now,
        created_at: now,
        updated_at: now,
    };

    let order_items = batch
        .order_items
        .into_iter()
        .map(|draft| build_item(draft, &order))
        .collect::<AppResult<Vec<_>>>()?;
    let docs = order_items
        .iter()
        .map(to_document)
        .collect::<Result<Vec<_>, _>>()?;

    store.insert(Orders::COLLECTION, &order).await?;

    if let Err(e) = store.insert_many(ORDER_ITEMS, docs).await {
        tracing::warn!(
            order_id = %order.order_id,
            error = %e,
            "Order stored without its items"
        );
        return Err(e.into());
    }

    tracing::info!(
        order_id = %order.order_id,
        table_id = %order.table_id,
        items = order_items.len(),
        placed_by = %user.id,
        "Order placed"
    );
    Ok(Json(OrderItemBatchCreated { order, order_items }))
}

/// GET /order-items/order/{order_id} - 订单聚合视图
pub async fn list_by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Vec<OrderGroup>>> {
    Ok(Json(aggregate_orders(state.store(), Some(&order_id)).await?))
}
