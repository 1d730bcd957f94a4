//! 认证模块
//!
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`password`] - Argon2 密码哈希

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, TokenPair};
pub use middleware::require_auth;
pub use password::{hash_password, verify_password};
