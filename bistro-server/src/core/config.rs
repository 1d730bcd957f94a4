use std::path::PathBuf;
use std::time::Duration;

use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// Storage engine selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Embedded SurrealDB on RocksDB
    RocksDb,
    /// In-process, lost on restart
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "rocksdb" | "surrealdb" => Some(Self::RocksDb),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT (或 PORT) | 8000 | HTTP 服务端口 |
/// | STORE_BACKEND | rocksdb | `rocksdb` 或 `memory` |
/// | DB_PATH | {WORK_DIR}/database/bistro.db | RocksDB 路径 |
/// | DB_NAMESPACE | bistro | SurrealDB namespace |
/// | DB_NAME | restaurant | SurrealDB database |
/// | STORE_TIMEOUT_SECS | 100 | 单次存储操作时限 (秒) |
/// | LOG_LEVEL | info | 日志级别 (`RUST_LOG` 优先) |
/// | LOG_DIR | - | 设置后额外写入按天滚动的日志文件 |
/// | LOG_JSON | false | 日志文件使用 JSON 格式 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// JWT 相关变量见 [`JwtConfig::from_env`]。
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub store_backend: StoreBackend,
    pub db_path: Option<String>,
    pub db_namespace: String,
    pub db_name: String,
    /// 单次存储操作时限
    pub store_timeout: Duration,
    pub jwt: JwtConfig,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 无法解析的值回退到默认值；只有 JWT 密钥缺失 (release 构建) 会报错。
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .or_else(|_| std::env::var("PORT"))
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            store_backend: std::env::var("STORE_BACKEND")
                .ok()
                .and_then(|v| StoreBackend::parse(&v))
                .unwrap_or(StoreBackend::RocksDb),
            db_path: std::env::var("DB_PATH").ok(),
            db_namespace: std::env::var("DB_NAMESPACE").unwrap_or_else(|_| "bistro".into()),
            db_name: std::env::var("DB_NAME").unwrap_or_else(|_| "restaurant".into()),
            store_timeout: Duration::from_secs(
                std::env::var("STORE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(100),
            ),
            jwt: JwtConfig::from_env().map_err(|e| ServerError::Config(e.to_string()))?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        })
    }

    /// 内存存储 + 固定 JWT 配置，不读取环境变量
    ///
    /// 常用于测试场景
    pub fn in_memory(jwt: JwtConfig) -> Self {
        Self {
            work_dir: "./data".into(),
            http_port: 0,
            store_backend: StoreBackend::Memory,
            db_path: None,
            db_namespace: "bistro".into(),
            db_name: "restaurant".into(),
            store_timeout: Duration::from_secs(100),
            jwt,
            log_level: "info".into(),
            log_dir: None,
            log_json: false,
            environment: "test".into(),
        }
    }

    /// RocksDB 路径
    pub fn database_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.work_dir)
                .join("database")
                .join("bistro.db"),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
