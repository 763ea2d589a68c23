use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Tandem record server.
pub struct TandemServer {
    config: ServerConfig,
    state: AppState,
}

impl TandemServer {
    /// Build a server from configuration: opens the blob backend and binds
    /// the collection.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let state = config.build_state()?;
        Ok(Self { config, state })
    }

    /// Build a server around externally constructed state (injected
    /// backends).
    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        self.state.collection.ensure_ready().await?;
        if self.config.seed_on_start {
            let report = self.state.collection.reindex().await?;
            tracing::info!(
                "startup reindex: {} indexed, {} skipped",
                report.indexed,
                report.skipped
            );
        }
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("tandem server listening on {}", self.config.bind_addr);
        axum::serve(listener, self.router())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
