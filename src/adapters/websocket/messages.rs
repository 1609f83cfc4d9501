//! Events posted by WebSocket connection tasks to the gateway actor.

use super::registry::{ClientId, ClientSender};

/// Connection lifecycle and inbound traffic for one client.
///
/// Events from a single connection are posted in arrival order.
#[derive(Debug)]
pub enum ClientEvent {
    /// A client finished the upgrade; `outbound` feeds its writer task.
    Connected {
        client_id: ClientId,
        outbound: ClientSender,
    },

    /// A text frame arrived. Decoding happens in the gateway.
    Message { client_id: ClientId, text: String },

    /// The connection closed.
    Disconnected { client_id: ClientId },
}

impl ClientEvent {
    pub fn client_id(&self) -> ClientId {
        match self {
            ClientEvent::Connected { client_id, .. }
            | ClientEvent::Message { client_id, .. }
            | ClientEvent::Disconnected { client_id } => *client_id,
        }
    }
}
