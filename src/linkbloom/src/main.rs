//! LinkBloom — link-building campaign management service.
//!
//! Main entry point that wires the identity service, in-memory store, and
//! HTTP server together.

use clap::Parser;
use linkbloom_api::{ApiServer, AppStore};
use linkbloom_auth::IdentityService;
use linkbloom_core::config::AppConfig;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "linkbloom")]
#[command(about = "Link-building campaign management service")]
#[command(version)]
struct Cli {
    /// Bind host (overrides config)
    #[arg(long, env = "LINKBLOOM__API__HOST")]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "LINKBLOOM__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Simulated payment delay in milliseconds (overrides config)
    #[arg(long, env = "LINKBLOOM__CHECKOUT__PAYMENT_DELAY_MS")]
    payment_delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkbloom=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("LinkBloom starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(delay) = cli.payment_delay_ms {
        config.checkout.payment_delay_ms = delay;
    }

    info!(
        host = %config.api.host,
        http_port = config.api.http_port,
        payment_delay_ms = config.checkout.payment_delay_ms,
        "Configuration loaded"
    );

    let identity = Arc::new(IdentityService::new(&config.auth));
    let store = Arc::new(AppStore::new());

    let server = ApiServer::new(config, identity, store);
    server.start_http().await?;

    Ok(())
}
