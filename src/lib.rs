pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Proxy service module
mod utils;

use error::AppResult;
use modules::logger;
use proxy::{AppState, AxumServer};
use tracing::info;

/// Load config, start the proxy and serve until Ctrl-C
pub async fn run() -> AppResult<()> {
    // Initialize logger
    logger::init_logger();

    let config = modules::config::load_app_config()?;
    info!(
        "Proxying {} (server token: {}, client tokens allowed: {}, validate cert: {})",
        config.gitlab.url,
        config.gitlab.has_server_token(),
        config.gitlab.allow_client_side_access_token,
        config.gitlab.validate_cert
    );
    if !config.gitlab.validate_cert {
        tracing::warn!("TLS certificate validation of the GitLab API is disabled");
    }

    let state = AppState::new(config.gitlab.clone(), &config.server.api_key)?;
    let (server, handle) = AxumServer::start(&config.server, state).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    server.stop();
    handle
        .await
        .map_err(|e| error::AppError::Server(format!("Server task failed: {}", e)))?;

    Ok(())
}
