//! Order aggregation
//!
//! Joins every order item with its food, its order and the order's table,
//! then groups the lines by `(order_id, table_id, table_number)`.
//!
//! `payment_due` is the sum of `food.price` over the lines of a group. The
//! line quantity is carried through to the output but is not multiplied in.

use shared::models::OrderGroup;

use crate::AppResult;
use crate::db::collections::{FOODS, ORDER_ITEMS, ORDERS, TABLES};
use crate::db::{Accumulator, Filter, Pipeline, Projection, Stage, Store, from_document};

fn lookup(from: &str, local: &str, foreign: &str, as_field: &str) -> Stage {
    Stage::Lookup {
        from: from.to_string(),
        local_field: local.to_string(),
        foreign_field: foreign.to_string(),
        as_field: as_field.to_string(),
    }
}

fn unwind(path: &str) -> Stage {
    Stage::Unwind {
        path: path.to_string(),
        preserve_null_and_empty: true,
    }
}

fn field(name: &str, projection: Projection) -> (String, Projection) {
    (name.to_string(), projection)
}

/// Aggregation over `order_items`, scoped to one order or to all of them
pub fn order_pipeline(order_id: Option<&str>) -> Pipeline {
    let filter = match order_id {
        Some(id) => Filter::eq("order_id", id),
        None => Filter::all(),
    };

    Pipeline::new()
        .stage(Stage::Match(filter))
        .stage(lookup(FOODS, "food_id", "food_id", "food"))
        .stage(unwind("food"))
        .stage(lookup(ORDERS, "order_id", "order_id", "order"))
        .stage(unwind("order"))
        .stage(lookup(TABLES, "order.table_id", "table_id", "table"))
        .stage(unwind("table"))
        .stage(Stage::Project(vec![
            field("amount", Projection::path("food.price")),
            field("food_name", Projection::path("food.name")),
            field("food_image", Projection::path("food.food_image")),
            field("table_number", Projection::path("table.table_number")),
            field("table_id", Projection::path("table.table_id")),
            field("order_id", Projection::path("order.order_id")),
            field("price", Projection::path("food.price")),
            field("quantity", Projection::Include),
        ]))
        .stage(Stage::Group {
            key: vec![
                ("order_id".to_string(), "order_id".to_string()),
                ("table_id".to_string(), "table_id".to_string()),
                ("table_number".to_string(), "table_number".to_string()),
            ],
            accumulators: vec![
                ("payment_due".to_string(), Accumulator::Sum("amount".to_string())),
                ("total_count".to_string(), Accumulator::Count),
                ("order_items".to_string(), Accumulator::PushRoot),
            ],
        })
        .stage(Stage::Project(vec![
            field("order_id", Projection::path("_id.order_id")),
            field("table_id", Projection::path("_id.table_id")),
            field("payment_due", Projection::Include),
            field("total_count", Projection::Include),
            field("table_number", Projection::path("_id.table_number")),
            field("order_items", Projection::Include),
        ]))
}

/// Run the order aggregation; groups come back in first-arrival order
pub async fn aggregate_orders(store: &Store, order_id: Option<&str>) -> AppResult<Vec<OrderGroup>> {
    let rows = store.aggregate(ORDER_ITEMS, &order_pipeline(order_id)).await?;
    let groups = rows
        .into_iter()
        .map(from_document)
        .collect::<Result<Vec<OrderGroup>, _>>()?;

    tracing::debug!(order_id = ?order_id, groups = groups.len(), "Orders aggregated");
    Ok(groups)
}
