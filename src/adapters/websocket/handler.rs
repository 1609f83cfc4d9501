//! WebSocket upgrade handler for control clients.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Upgrade to WebSocket
//! 2. Announce the client to the gateway with its outbound queue
//! 3. Forward text frames to the gateway, drain the queue to the socket
//! 4. Announce the disconnect

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::domain::protocol::{self, ProtocolMessage};

use super::{messages::ClientEvent, registry::ClientId};

/// State required for WebSocket handling.
#[derive(Debug, Clone)]
pub struct WebSocketState {
    /// Channel into the gateway actor.
    pub events: UnboundedSender<ClientEvent>,
}

impl WebSocketState {
    /// Create a new WebSocket state.
    pub fn new(events: UnboundedSender<ClientEvent>) -> Self {
        Self { events }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WebSocketState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an established WebSocket connection.
///
/// Runs for the lifetime of the connection. The gateway learns about the
/// client before any frame is read, so its initial state snapshot is queued
/// ahead of every broadcast.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();
    let client_id = ClientId::new();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

    if state
        .events
        .send(ClientEvent::Connected {
            client_id,
            outbound: outbound_tx,
        })
        .is_err()
    {
        tracing::warn!(client_id = %client_id, "Gateway stopped, rejecting client");
        let _ = sender.send(Message::Close(None)).await;
        return;
    }
    tracing::info!(client_id = %client_id, "WebSocket client connected");

    let mut send_task = tokio::spawn(forward_outbound(client_id, outbound_rx, sender));

    let events = state.events.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    if events.send(ClientEvent::Message { client_id, text }).is_err() {
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(client_id = %client_id, "Received unsupported binary message");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Protocol-level keepalive, answered by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(client_id = %client_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(client_id = %client_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    let _ = state.events.send(ClientEvent::Disconnected { client_id });
    tracing::info!(client_id = %client_id, "WebSocket client disconnected");
}

/// Drain a client's queue onto its socket, stamping each message as it is sent.
async fn forward_outbound(
    client_id: ClientId,
    mut outbound: UnboundedReceiver<ProtocolMessage>,
    mut sender: futures::stream::SplitSink<WebSocket, Message>,
) {
    while let Some(message) = outbound.recv().await {
        let text = protocol::encode(&message);
        if let Err(e) = sender.send(Message::Text(text)).await {
            tracing::debug!(client_id = %client_id, "Send error, closing connection: {}", e);
            break;
        }
    }
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route("/", get(ws_handler))
}
