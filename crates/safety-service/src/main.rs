//! Safety API HTTP server.
//!
//! # Configuration
//!
//! - `SAFETY_BELLS_PATH` - Emergency bell JSON document (default: `emergency_bells.json`)
//! - `SAFETY_HOTZONE_DB` - Hotzone SQLite file (default: `database/hotzone.db`)
//! - `SAFETY_COMMUNITY_DB` - Community SQLite file (default: `database/community.db`)
//! - `SAFETY_SEED_SAMPLES` - Insert sample hotzones into an empty store (default: true)
//! - `SERVICE_HOST` / `SERVICE_PORT` - Listen address (default: `0.0.0.0:5001`)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use tracing::{error, info};

use safety_service::build_router;
use safety_service_shared::{init_logging, AppState, LoggingConfig, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("safety-api");
    init_logging(&logging_config);

    let config = ServiceConfig::from_env();
    info!(
        bells = %config.bells_path.display(),
        hotzone_db = %config.hotzone_db.display(),
        community_db = %config.community_db.display(),
        port = config.port,
        "starting safety service"
    );

    let state = AppState::open(&config).map_err(|e| {
        error!(error = %e, "failed to open stores");
        e
    })?;

    let app = build_router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
