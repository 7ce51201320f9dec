//! Front-desk queue daemon - composition root

mod config;

use anyhow::Result;
use config::{DaemonConfig, LogFormat};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use frontdesk_api_rpc::RpcServer;
use frontdesk_core::application::WalkInQueueService;
use frontdesk_core::port::id_provider::UuidProvider;
use frontdesk_core::port::time_provider::SystemTimeProvider;
use frontdesk_infra_sqlite::{create_pool, run_migrations, SqliteQueueRepository};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env()?;

    // 2. Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("frontdesk=info"))?;

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Front-desk queue v{} starting...", frontdesk_core::VERSION);

    // 3. Initialize database
    if let Some(dir) = config.db_dir() {
        std::fs::create_dir_all(&dir)?;
    }
    info!(db_path = %config.db_path, "Initializing database...");

    let pool = create_pool(&config.db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies
    let repo = Arc::new(SqliteQueueRepository::new(pool));
    let service = Arc::new(WalkInQueueService::new(
        repo.clone(),
        repo,
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        config.policy.clone(),
    ));
    info!(
        auto_promote = config.policy.auto_promote_on_completion,
        transitions = ?config.policy.transitions,
        "Queue policy loaded"
    );

    // 5. Verify stored ordering; renumber if an earlier run left gaps
    if let Err(e) = service.check_integrity().await {
        warn!(error = %e, "Stored queue ordering is inconsistent, repairing");
        match service.repair().await {
            Ok(rewritten) => info!(rewritten, "Queue repair completed"),
            Err(e) => error!(error = %e, "Queue repair failed"),
        }
    }

    // 6. Start JSON-RPC server
    let rpc_handle = RpcServer::new(config.rpc.clone(), service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!("System ready. Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");
    Ok(())
}
