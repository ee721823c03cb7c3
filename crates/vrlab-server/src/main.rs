//! VR Lab service binary.
//!
//! Wires configuration, structured logging, the in-memory stores, the
//! interaction collector, and the API server together, then serves until
//! Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `VRLAB_CONFIG` or `vrlab-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build shared state and pick the collector
//! 4. Serve the API until a shutdown signal arrives
//! 5. Close live sessions and clear the stores

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use vrlab_api::AppState;
use vrlab_core::collector::HttpCollector;
use vrlab_core::config::{AppConfig, DEFAULT_CONFIG_FILE, LoggingConfig};

use crate::error::StartupError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging, or the server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = config_path();
    let config = AppConfig::load_or_default(&config_path).map_err(StartupError::from)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging)?;
    info!(
        config = %config_path.display(),
        host = %config.server.host,
        port = config.server.port,
        collector = config.collector.endpoint.as_deref().unwrap_or("in-process"),
        "vrlab-server starting"
    );

    // 3. Build shared state.
    let state = Arc::new(build_state(&config)?);
    info!(
        weather_interval_ms = config.session.weather_interval_ms,
        command_buffer = config.session.command_buffer,
        idle_timeout_ms = config.session.idle_timeout_ms,
        "Application state initialized"
    );

    // 4. Serve until Ctrl-C.
    vrlab_api::start_server(&config.server, Arc::clone(&state), shutdown_signal())
        .await
        .map_err(StartupError::from)?;

    // 5. Tear down sessions and stores.
    state.shutdown().await;
    info!("vrlab-server shutdown complete");

    Ok(())
}

/// Config file location: `VRLAB_CONFIG` if set, else the default name in
/// the working directory.
fn config_path() -> PathBuf {
    std::env::var_os("VRLAB_CONFIG")
        .filter(|p| !p.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<(), StartupError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_unset) => level_filter(&logging.level)?,
    };

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
    Ok(())
}

fn level_filter(level: &str) -> Result<EnvFilter, StartupError> {
    EnvFilter::try_new(level).map_err(|e| StartupError::Logging {
        level: level.to_owned(),
        message: e.to_string(),
    })
}

/// Stores plus the collector the config asks for. Without an endpoint,
/// sessions feed the in-process interaction log.
fn build_state(config: &AppConfig) -> Result<AppState, StartupError> {
    let state = AppState::in_memory(config.session.clone());
    match config.collector.endpoint.as_deref() {
        Some(endpoint) => {
            let collector = HttpCollector::new(endpoint, config.collector.timeout())?;
            Ok(state.with_collector(Arc::new(collector)))
        }
        None => Ok(state),
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_must_parse() {
        assert!(level_filter("info").is_ok());
        assert!(level_filter("vrlab_core=debug,warn").is_ok());
        assert!(matches!(
            level_filter("vrlab_core=loud"),
            Err(StartupError::Logging { .. })
        ));
    }

    #[tokio::test]
    async fn state_without_endpoint_uses_in_process_log() {
        let config = AppConfig::default();
        let state = build_state(&config);
        assert!(state.is_ok());
    }

    #[tokio::test]
    async fn state_with_endpoint_builds_http_collector() {
        let mut config = AppConfig::default();
        config.collector.endpoint = Some("http://127.0.0.1:9/api/interactions".to_owned());
        assert!(build_state(&config).is_ok());
    }
}
