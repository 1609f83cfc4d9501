//! Lighting gateway binary.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lighting_gateway::application::{self, GatewayError};
use lighting_gateway::config::{ConfigError, GatewayConfig, LogFormat, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), GatewayError> {
    let config = GatewayConfig::load()?;
    init_tracing(&config.server);
    config.validate().map_err(ConfigError::from)?;

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    let connector = Arc::new(config.controller.connector());

    application::run(config, listener, connector, shutdown_signal()).await?;
    tracing::info!("Gateway stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match server.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
