//! Gateway actor - the single owner of device state and both transports.
//!
//! Every input (client connect/message/close, controller connect/data/close,
//! reconnect timer, heartbeat tick) arrives through one `tokio::select!` loop
//! and is handled to completion before the next. Handlers never await, so
//! the [`DeviceStateStore`] needs no lock.
//!
//! # Event Flow
//!
//! ```text
//! client command ──► Gateway ──► HardwareLink ──► controller
//!                       │
//!                       └─► optimistic store update ──► ack / group broadcast
//!
//! controller message ──► HardwareLink ──► Gateway ──► store ──► per-device
//!                                                              broadcast
//! ```

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::time::{self, Instant};

use crate::adapters::tcp::{HardwareLink, LinkEvent, LinkNotification};
use crate::adapters::websocket::{ClientEvent, ClientId, ClientRegistry, ClientSender};
use crate::domain::lighting::{DeviceId, DeviceState, DeviceStateStore};
use crate::domain::protocol::{self, Command, ProtocolMessage, ProtocolProfile};

/// The gateway event loop and the state it owns.
#[derive(Debug)]
pub struct Gateway {
    profile: ProtocolProfile,
    store: DeviceStateStore,
    link: HardwareLink,
    link_events: UnboundedReceiver<LinkEvent>,
    clients: ClientRegistry,
    client_events: UnboundedReceiver<ClientEvent>,
}

impl Gateway {
    /// Build a gateway around a (disconnected) hardware link.
    ///
    /// Returns the sender WebSocket connections use to reach the gateway.
    pub fn new(
        profile: ProtocolProfile,
        link: HardwareLink,
        link_events: UnboundedReceiver<LinkEvent>,
    ) -> (Self, UnboundedSender<ClientEvent>) {
        let (client_tx, client_events) = mpsc::unbounded_channel();
        let gateway = Self {
            profile,
            store: DeviceStateStore::new(),
            link,
            link_events,
            clients: ClientRegistry::new(),
            client_events,
        };
        (gateway, client_tx)
    }

    /// Current device state.
    pub fn device_state(&self) -> DeviceState {
        self.store.snapshot()
    }

    pub fn client_count(&self) -> usize {
        self.clients.client_count()
    }

    pub fn link(&self) -> &HardwareLink {
        &self.link
    }

    /// Run until the shutdown flag flips to `true` (or its sender is dropped).
    ///
    /// Connects the hardware link on entry and tears it down on exit.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        self.link.connect();

        let period = Duration::from_secs(self.profile.heartbeat_interval_secs);
        let mut heartbeat = time::interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                Some(event) = self.link_events.recv() => self.handle_link_event(event),
                Some(event) = self.client_events.recv() => self.handle_client_event(event),
                _ = heartbeat.tick() => self.send_heartbeat(),
            }
        }

        tracing::info!("Gateway shutting down");
        self.link.disconnect();
    }

    /// Apply one event from a WebSocket connection.
    pub fn handle_client_event(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::Connected {
                client_id,
                outbound,
            } => self.on_client_connected(client_id, outbound),
            ClientEvent::Message { client_id, text } => self.on_client_message(client_id, &text),
            ClientEvent::Disconnected { client_id } => {
                if self.clients.unregister(&client_id) {
                    tracing::debug!(
                        client_id = %client_id,
                        clients = self.clients.client_count(),
                        "Client removed"
                    );
                }
            }
        }
    }

    /// Apply one event from the hardware link.
    pub fn handle_link_event(&mut self, event: LinkEvent) {
        for notification in self.link.handle_event(event) {
            match notification {
                LinkNotification::Connected => {
                    tracing::info!("Controller link up");
                }
                LinkNotification::Disconnected => {
                    tracing::info!("Controller link down");
                }
                LinkNotification::Message(message) => self.on_controller_message(&message),
            }
        }
    }

    /// Broadcast a heartbeat to every client and forward it to the controller.
    pub fn send_heartbeat(&mut self) {
        let heartbeat = self.profile.heartbeat();
        let delivered = self.clients.broadcast(&heartbeat);
        if let Err(e) = self.link.send_command(&heartbeat) {
            tracing::debug!(error = %e, "Heartbeat not forwarded to controller");
        }
        tracing::info!(clients = delivered, "Heartbeat sent");
    }

    fn on_client_connected(&mut self, client_id: ClientId, outbound: ClientSender) {
        self.clients.register(client_id, outbound);
        for (device, on) in self.store.snapshot().devices() {
            self.clients
                .send_to(&client_id, self.profile.lamp_ack(device, on));
        }
        tracing::debug!(
            client_id = %client_id,
            clients = self.clients.client_count(),
            "Client registered, current state sent"
        );
    }

    fn on_client_message(&mut self, client_id: ClientId, text: &str) {
        let message = match protocol::decode(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(client_id = %client_id, error = %e, "Ignoring undecodable client message");
                return;
            }
        };
        tracing::debug!(
            client_id = %client_id,
            command = %message.command(),
            node_mac = %message.node_mac(),
            "Received from client"
        );

        // The controller owns eventual state; every command is relayed.
        if let Err(e) = self.link.send_command(&message) {
            tracing::debug!(client_id = %client_id, error = %e, "Client command not relayed");
        }

        match self.profile.classify(&message) {
            Command::LampControl => {
                let on = message.action_state().is_on();
                if let Some(device) = self.known_device(&message) {
                    self.store.apply_individual_command(device, on);
                }
                // Acknowledged even for nodes outside the store, so the
                // sender's optimistic toggle settles. State is untouched.
                self.clients
                    .send_to(&client_id, self.profile.node_ack(message.node_mac(), on));
            }
            Command::GroupControl => {
                let on = message.action_state().is_on();
                self.store.apply_group_command(on);
                self.clients.broadcast(&self.profile.group_status(on));
            }
            _ => {
                tracing::debug!(command = %message.command(), "Relayed without local interpretation");
            }
        }
    }

    fn on_controller_message(&mut self, message: &ProtocolMessage) {
        let state = match self.profile.classify(message) {
            Command::LampAck => {
                let Some(device) = self.known_device(message) else {
                    return;
                };
                self.store
                    .apply_individual_ack(device, message.current_state().is_on())
            }
            Command::GroupStatus => self
                .store
                .apply_group_status(message.current_state().is_on()),
            _ => {
                tracing::debug!(command = %message.command(), "Controller message not applied to state");
                return;
            }
        };
        self.broadcast_state(state);
    }

    fn broadcast_state(&self, state: DeviceState) {
        for (device, on) in state.devices() {
            self.clients.broadcast(&self.profile.lamp_ack(device, on));
        }
    }

    fn known_device(&self, message: &ProtocolMessage) -> Option<DeviceId> {
        match message.node_mac().parse() {
            Ok(device) => Some(device),
            Err(e) => {
                tracing::warn!(node_mac = %message.node_mac(), error = %e, "Unknown device, state not updated");
                None
            }
        }
    }
}
