//! HTTP server lifecycle management.
//!
//! Provides [`start_server`] which binds to a TCP port and serves the API
//! until the supplied shutdown future resolves. In-flight requests are
//! allowed to finish before it returns.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use vrlab_core::config::ServerSection;

use crate::router::build_router;
use crate::state::AppState;

/// Start the API server and run until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the address is invalid, the TCP listener cannot
/// bind, or the server encounters a fatal I/O error.
pub async fn start_server<F>(
    config: &ServerSection,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    info!("API server stopped accepting connections");
    Ok(())
}

/// Errors that can occur when starting or running the API server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_host_fails_to_bind() {
        let config = ServerSection {
            host: "not an address".to_owned(),
            port: 0,
        };
        let state = Arc::new(AppState::in_memory(vrlab_core::config::SessionConfig::default()));
        let result = start_server(&config, state, async {}).await;
        assert!(matches!(result, Err(ServerError::Bind(_))));
    }

    #[tokio::test]
    async fn resolved_shutdown_stops_server() {
        let config = ServerSection {
            host: "127.0.0.1".to_owned(),
            port: 0,
        };
        let state = Arc::new(AppState::in_memory(vrlab_core::config::SessionConfig::default()));
        let result = start_server(&config, state, async {}).await;
        assert!(result.is_ok());
    }
}
