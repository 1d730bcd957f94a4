//! Bistro Server - 餐厅后台 REST 服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): 记录存储边界，嵌入式 SurrealDB 或内存引擎
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **订单聚合** (`orders`): 订单明细聚合与账单视图
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! bistro-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # JWT 认证、密码哈希
//! ├── db/            # 存储引擎与聚合管道
//! ├── orders/        # 订单聚合、账单组装
//! ├── services/      # 路由组装、分页
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、错误类型
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::Store;
pub use services::build_app;
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ____  _      __
   / __ )(_)____/ /__________
  / __  / / ___/ __/ ___/ __ \
 / /_/ / (__  ) /_/ /  / /_/ /
/_____/_/____/\__/_/   \____/
    "#
    );
}
