use std::fs;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::get_data_dir;
use crate::error::AppResult;

pub fn get_log_dir() -> AppResult<PathBuf> {
    let log_dir = get_data_dir()?.join("logs");

    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }

    Ok(log_dir)
}

/// Initialize logger system
pub fn init_logger() {
    // Capture log macro logs
    let _ = tracing_log::LogTracer::init();

    // Console output layer
    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    // Default to INFO and above
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer);

    match get_log_dir() {
        Ok(log_dir) => {
            // Daily rolling file, ANSI disabled
            let file_appender = tracing_appender::rolling::daily(log_dir, "gitlab-proxy.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::Layer::new()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_level(true);

            // try_init: a second initialization is not fatal
            let _ = registry.with(file_layer).try_init();

            // The guard must outlive the program to keep flushing the file
            std::mem::forget(guard);
            info!("Logger system initialized (Console + File Persistence)");
        }
        Err(e) => {
            let _ = registry.try_init();
            tracing::warn!("Log directory unavailable, logging to console only: {}", e);
        }
    }
}
