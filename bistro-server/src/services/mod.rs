//! 服务层
//!
//! - [`http`] - 路由组装与 HTTP 中间件
//! - [`pagination`] - 列表分页

pub mod http;
pub mod pagination;

pub use http::build_app;
pub use pagination::{Page, PageQuery, PageRequest, paginate};
