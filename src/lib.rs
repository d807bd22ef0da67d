pub mod api;
pub mod config;
pub mod core_state;
pub mod models;
pub mod nudges; // Context-aware nudge engine
pub mod risk; // Vitals risk scoring
pub mod scenarios;
pub mod session;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initialize tracing. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Serve the API until ctrl-c, then drain in-flight requests.
pub async fn run() -> Result<(), String> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let server_config = config::ServerConfig::from_env();
    let core = Arc::new(core_state::CoreState::new());
    let server = api::start_server(core, server_config.addr).await?;
    tracing::info!(addr = %server.info.server_addr, "Listening");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for ctrl-c: {e}"))?;

    server.stop().await;
    Ok(())
}
