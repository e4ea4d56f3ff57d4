//! HTTP server — binds the router with the standard middleware stack.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use linkbloom_auth::IdentityService;
use linkbloom_core::config::AppConfig;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::AppState;
use crate::router::app_router;
use crate::store::AppStore;

/// Main API server for the LinkBloom service.
pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: AppConfig, identity: Arc<IdentityService>, store: Arc<AppStore>) -> Self {
        let state = AppState {
            store,
            identity,
            payment_delay: Duration::from_millis(config.checkout.payment_delay_ms),
            start_time: Instant::now(),
        };
        Self { config, state }
    }

    /// The fully assembled router with middleware layers applied.
    pub fn router(&self) -> Router {
        app_router(self.state.clone())
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Start the HTTP server and serve until shutdown.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
