//! Data models
//!
//! Shared between bistro-server and its clients (via API).
//! Records carry a string domain id (`<entity>_id`); the storage engine's own
//! identifiers never leave the server.

pub mod aggregate;
pub mod dining_table;
pub mod food;
pub mod invoice;
pub mod menu;
pub mod order;
pub mod order_item;
pub mod user;

// Re-exports
pub use aggregate::*;
pub use dining_table::*;
pub use food::*;
pub use invoice::*;
pub use menu::*;
pub use order::*;
pub use order_item::*;
pub use user::*;
