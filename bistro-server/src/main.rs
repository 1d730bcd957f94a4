use bistro_server::{Config, Server, ServerState, init_logger, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境变量 (.env 可选)
    dotenv::dotenv().ok();

    // 2. 加载配置
    let config = Config::from_env()?;

    // 3. 日志 (guard 需持有到进程退出)
    let _log_guard = init_logger(
        &config.log_level,
        config.log_json,
        config.log_dir.as_deref(),
    )?;

    print_banner();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "🦀 Bistro server starting..."
    );

    // 4. 初始化服务器状态
    let state = ServerState::initialize(&config).await?;

    // 5. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
