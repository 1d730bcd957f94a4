//! JWT 令牌服务
//!
//! 签发访问令牌与刷新令牌，验证并解析令牌。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::AppError;

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 密钥 (至少 32 字节)
    pub secret: String,
    /// 访问令牌有效期 (小时)
    pub access_ttl_hours: i64,
    /// 刷新令牌有效期 (小时)
    pub refresh_ttl_hours: i64,
    /// 令牌签发者
    pub issuer: String,
}

impl JwtConfig {
    /// 从环境变量加载
    ///
    /// `JWT_SECRET` 优先，其次 `SECRET_KEY`。调试构建下缺省时生成临时密钥。
    pub fn from_env() -> Result<Self, JwtError> {
        Ok(Self {
            secret: load_jwt_secret()?,
            access_ttl_hours: std::env::var("JWT_ACCESS_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24),
            refresh_ttl_hours: std::env::var("JWT_REFRESH_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(168),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "bistro-server".to_string()),
        })
    }

    /// Fixed secret with the default lifetimes
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl_hours: 24,
            refresh_ttl_hours: 168,
            issuer: "bistro-server".to_string(),
        }
    }
}

/// 存储在令牌中的 Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// 用户 ID
    pub uid: String,
    /// `access` | `refresh`
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl Claims {
    pub fn is_access(&self) -> bool {
        self.token_type == ACCESS
    }
}

/// 访问令牌 + 刷新令牌
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token has expired")]
    ExpiredToken,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),

    #[error("jwt configuration error: {0}")]
    ConfigError(String),
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ExpiredToken => AppError::token_expired(),
            JwtError::InvalidToken(_) => AppError::invalid_token("Invalid token"),
            JwtError::GenerationFailed(msg) => AppError::internal(msg),
            JwtError::ConfigError(msg) => AppError::config(msg),
        }
    }
}

/// 生成可打印的随机密钥 (用于开发环境)
pub fn generate_printable_secret() -> Result<String, JwtError> {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_=+.";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes)
        .map_err(|_| JwtError::ConfigError("failed to generate random key".to_string()))?;

    Ok(bytes
        .iter()
        .map(|b| ALLOWED[(*b as usize) % ALLOWED.len()] as char)
        .collect())
}

fn load_jwt_secret() -> Result<String, JwtError> {
    let configured = std::env::var("JWT_SECRET")
        .or_else(|_| std::env::var("SECRET_KEY"))
        .ok();

    match configured {
        Some(secret) if secret.len() < 32 => Err(JwtError::ConfigError(
            "JWT_SECRET must be at least 32 characters long".to_string(),
        )),
        Some(secret) => Ok(secret),
        None => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set, generating a temporary key for development");
                generate_printable_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production".to_string(),
                ))
            }
        }
    }
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户签发访问令牌和刷新令牌
    pub fn issue(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        uid: &str,
    ) -> Result<TokenPair, JwtError> {
        let token = self.sign(
            email,
            first_name,
            last_name,
            uid,
            ACCESS,
            Duration::hours(self.config.access_ttl_hours),
        )?;
        let refresh_token = self.sign(
            email,
            first_name,
            last_name,
            uid,
            REFRESH,
            Duration::hours(self.config.refresh_ttl_hours),
        )?;
        Ok(TokenPair {
            token,
            refresh_token,
        })
    }

    fn sign(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        uid: &str,
        token_type: &str,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            uid: uid.to_string(),
            token_type: token_type.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "iat", "iss"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// 当前用户上下文 (从访问令牌解析)
///
/// 由认证中间件注入请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.uid,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
        }
    }
}
