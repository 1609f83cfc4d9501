//! Registry of connected WebSocket clients.
//!
//! Each client owns an unbounded outbound queue drained by its writer task.
//! The registry is owned by the gateway actor, so it needs no lock; sends
//! never block and a slow client simply accumulates queued messages.

use std::collections::HashMap;

use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::domain::protocol::ProtocolMessage;

/// Unique identifier for a WebSocket client connection.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Create a new random client ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sender half of a client's outbound queue.
pub type ClientSender = UnboundedSender<ProtocolMessage>;

/// Connected clients keyed by [`ClientId`].
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<ClientId, ClientSender>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client. A reused ID replaces the previous queue.
    pub fn register(&mut self, client_id: ClientId, sender: ClientSender) {
        self.clients.insert(client_id, sender);
    }

    /// Remove a client, returning whether it was known.
    pub fn unregister(&mut self, client_id: &ClientId) -> bool {
        self.clients.remove(client_id).is_some()
    }

    /// Queue a message for one client.
    ///
    /// Returns `false` if the client is unknown or its writer has gone.
    pub fn send_to(&self, client_id: &ClientId, message: ProtocolMessage) -> bool {
        match self.clients.get(client_id) {
            Some(sender) => sender.send(message).is_ok(),
            None => false,
        }
    }

    /// Queue a message for every client, returning how many accepted it.
    pub fn broadcast(&self, message: &ProtocolMessage) -> usize {
        self.clients
            .values()
            .filter(|sender| sender.send(message.clone()).is_ok())
            .count()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lighting::DeviceId;
    use crate::domain::protocol::ProtocolProfile;
    use tokio::sync::mpsc;

    fn ack() -> ProtocolMessage {
        ProtocolProfile::default().lamp_ack(DeviceId::Bulb1, true)
    }

    #[test]
    fn register_and_unregister_track_count() {
        let mut registry = ClientRegistry::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = ClientId::new();

        registry.register(id, tx);
        assert_eq!(registry.client_count(), 1);

        assert!(registry.unregister(&id));
        assert!(!registry.unregister(&id));
        assert_eq!(registry.client_count(), 0);
    }

    #[test]
    fn send_to_reaches_only_that_client() {
        let mut registry = ClientRegistry::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let a = ClientId::new();
        registry.register(a, tx_a);
        registry.register(ClientId::new(), tx_b);

        assert!(registry.send_to(&a, ack()));
        assert_eq!(rx_a.try_recv().unwrap(), ack());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn send_to_unknown_client_returns_false() {
        let registry = ClientRegistry::new();
        assert!(!registry.send_to(&ClientId::new(), ack()));
    }

    #[test]
    fn broadcast_reaches_every_live_client() {
        let mut registry = ClientRegistry::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let (tx_gone, rx_gone) = mpsc::unbounded_channel();
        registry.register(ClientId::new(), tx_a);
        registry.register(ClientId::new(), tx_b);
        registry.register(ClientId::new(), tx_gone);
        drop(rx_gone);

        assert_eq!(registry.broadcast(&ack()), 2);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn client_id_display_is_uuid() {
        let display = ClientId::new().to_string();
        assert_eq!(display.len(), 36);
    }
}
