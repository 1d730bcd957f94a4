//! 订单聚合
//!
//! - [`aggregation`] - 订单明细聚合 (items ⋈ foods ⋈ orders ⋈ tables)
//! - [`invoice`] - 账单视图组装

pub mod aggregation;
pub mod invoice;

pub use aggregation::{aggregate_orders, order_pipeline};
pub use invoice::compose_invoice;
