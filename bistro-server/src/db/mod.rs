//! Database Module
//!
//! - [`store`] - Record Store contract and the time-budgeted [`Store`] handle
//! - [`pipeline`] - aggregation stages executed in process
//! - [`surreal`] - embedded SurrealDB engine (RocksDB)
//! - [`memory`] - in-process engine

pub mod memory;
pub mod pipeline;
pub mod store;
pub mod surreal;

pub use memory::MemoryStore;
pub use pipeline::{Accumulator, Pipeline, Projection, Stage};
pub use store::{
    Document, Filter, RecordStore, Store, StoreError, StoreResult, UpdateOutcome, from_document,
    to_document,
};
pub use surreal::SurrealStore;

/// Collection names
pub mod collections {
    pub const FOODS: &str = "foods";
    pub const MENUS: &str = "menus";
    pub const TABLES: &str = "tables";
    pub const ORDERS: &str = "orders";
    pub const ORDER_ITEMS: &str = "order_items";
    pub const INVOICES: &str = "invoices";
    pub const USERS: &str = "users";
}
