//! Wiring of the gateway actor, the hardware link and the WebSocket server.

use std::future::{Future, IntoFuture};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use super::error::GatewayError;
use super::gateway::Gateway;
use crate::adapters::tcp::HardwareLink;
use crate::adapters::websocket::{websocket_router, WebSocketState};
use crate::config::GatewayConfig;
use crate::ports::ControllerConnector;

/// Run the gateway until `shutdown` resolves or the server fails.
///
/// Open client connections are not drained; they close when the process
/// exits or when their writer tasks observe the gateway is gone.
pub async fn run<F>(
    config: GatewayConfig,
    listener: TcpListener,
    connector: Arc<dyn ControllerConnector>,
    shutdown: F,
) -> Result<(), GatewayError>
where
    F: Future<Output = ()> + Send,
{
    let profile = config.protocol.profile();
    let identity = &profile.identity;
    tracing::info!(
        firmware_version = %identity.firmware_version,
        gateway_mac = %identity.gateway_mac,
        node_mac = %identity.node_mac,
        "Starting lighting gateway"
    );
    tracing::info!(
        address = %listener.local_addr()?,
        controller = %connector.target(),
        heartbeat_secs = profile.heartbeat_interval_secs,
        "WebSocket server listening"
    );

    let (link, link_events) = HardwareLink::new(connector, config.controller.reconnect_delay());
    let (gateway, client_events) = Gateway::new(profile, link, link_events);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let gateway_task = tokio::spawn(gateway.run(shutdown_rx));

    let app = websocket_router()
        .with_state(WebSocketState::new(client_events))
        .layer(TraceLayer::new_for_http());

    let served = tokio::select! {
        result = axum::serve(listener, app).into_future() => result,
        _ = shutdown => {
            tracing::info!("Shutdown requested");
            Ok(())
        }
    };

    let _ = shutdown_tx.send(true);
    gateway_task.await?;
    served?;
    Ok(())
}
