use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::config::StoreBackend;
use crate::core::{Config, Result};
use crate::db::{MemoryStore, Store, SurrealStore};

/// 服务器状态 - 通过 axum `State` 注入所有处理器
///
/// 所有持久状态都在存储引擎中；这里只持有句柄。
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 存储句柄 (带单次操作时限)
    pub store: Store,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, store: Store, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            store,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按配置打开存储引擎：RocksDB 路径的父目录不存在时自动创建。
    pub async fn initialize(config: &Config) -> Result<Self> {
        let store = match config.store_backend {
            StoreBackend::RocksDb => {
                let path = config.database_path();
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let engine = SurrealStore::open(
                    &path.to_string_lossy(),
                    &config.db_namespace,
                    &config.db_name,
                )
                .await?;
                Store::new(Arc::new(engine), config.store_timeout)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store, data is lost on restart");
                Store::new(Arc::new(MemoryStore::new()), config.store_timeout)
            }
        };

        Ok(Self::with_store(config.clone(), store))
    }

    /// 基于任意存储构建状态
    pub fn with_store(config: Config, store: Store) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self::new(config, store, jwt_service)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
