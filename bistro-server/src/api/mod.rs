//! API 路由模块
//!
//! # 结构
//!
//! - [`crud`] - 通用 CRUD 处理器
//! - [`health`] - 健康检查
//! - [`users`] - 注册、登录、用户查询
//! - [`foods`] - 菜品管理接口
//! - [`menus`] - 菜单管理接口
//! - [`tables`] - 桌台管理接口
//! - [`orders`] - 订单管理接口
//! - [`order_items`] - 订单明细与下单接口
//! - [`invoices`] - 账单接口

pub mod crud;

pub mod health;
pub mod users;

// Data models API
pub mod foods;
pub mod invoices;
pub mod menus;
pub mod order_items;
pub mod orders;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::AppResult;
