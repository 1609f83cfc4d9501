//! Hardware link: the single logical connection to the lighting controller.
//!
//! # Lifecycle
//!
//! ```text
//! Disconnected --connect()--> Connecting --transport up--> Connected
//!      ^                           |                           |
//!      |                     attempt failed              close / error
//!      |                           v                           |
//!      +---- (reconnect delay) --- Disconnected <--------------+
//! ```
//!
//! There is no terminal state; the link retries forever until
//! [`HardwareLink::disconnect`] is called at shutdown.
//!
//! The link itself never awaits. I/O and timers run in spawned tasks that
//! post [`LinkEvent`]s to a channel; the owner feeds those back through
//! [`HardwareLink::handle_event`], which keeps every state change on the
//! owner's task. Each connection attempt carries a generation number so
//! events from a torn-down attempt are ignored.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::domain::foundation::StateMachine;
use crate::domain::protocol::{self, Framing, LineFraming, ProtocolMessage};
use crate::ports::ControllerConnector;

use super::connection::run_connection;

/// Default delay between a close and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Connection state of the hardware link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

impl StateMachine for LinkState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use LinkState::*;
        matches!(
            (self, target),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Disconnected)
                | (Connected, Disconnected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use LinkState::*;
        match self {
            Disconnected => vec![Connecting],
            Connecting => vec![Connected, Disconnected],
            Connected => vec![Disconnected],
        }
    }
}

/// Raw transport and timer events, posted by the link's background tasks.
#[derive(Debug)]
pub enum LinkEvent {
    /// Transport-level connect succeeded.
    Connected { generation: u64 },
    /// Bytes read from the controller.
    Data { generation: u64, bytes: Vec<u8> },
    /// The connection attempt failed or the socket closed.
    Closed {
        generation: u64,
        error: Option<String>,
    },
    /// The reconnect delay elapsed.
    ReconnectDue,
}

/// What the link reports to its owner after handling an event.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkNotification {
    Connected,
    Disconnected,
    Message(ProtocolMessage),
}

/// Why a command was not handed to the controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("Not connected to controller")]
    NotConnected,

    #[error("Controller connection closed")]
    ConnectionClosed,
}

/// Owner-side half of the controller connection.
pub struct HardwareLink {
    connector: Arc<dyn ControllerConnector>,
    framing: Box<dyn Framing>,
    state: LinkState,
    generation: u64,
    reconnect_delay: Duration,
    outbound: Option<UnboundedSender<Vec<u8>>>,
    io_task: Option<JoinHandle<()>>,
    reconnect_timer: Option<JoinHandle<()>>,
    events: UnboundedSender<LinkEvent>,
}

impl std::fmt::Debug for HardwareLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HardwareLink")
            .field("target", &self.connector.target())
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("reconnect_pending", &self.reconnect_pending())
            .finish_non_exhaustive()
    }
}

impl HardwareLink {
    /// Create a disconnected link using newline framing.
    ///
    /// Returns the receiver the owner must drain into [`Self::handle_event`].
    pub fn new(
        connector: Arc<dyn ControllerConnector>,
        reconnect_delay: Duration,
    ) -> (Self, UnboundedReceiver<LinkEvent>) {
        Self::with_framing(connector, reconnect_delay, Box::new(LineFraming::new()))
    }

    /// Create a disconnected link with a custom framing.
    pub fn with_framing(
        connector: Arc<dyn ControllerConnector>,
        reconnect_delay: Duration,
        framing: Box<dyn Framing>,
    ) -> (Self, UnboundedReceiver<LinkEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let link = Self {
            connector,
            framing,
            state: LinkState::Disconnected,
            generation: 0,
            reconnect_delay,
            outbound: None,
            io_task: None,
            reconnect_timer: None,
            events,
        };
        (link, events_rx)
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    /// Generation of the current (or most recent) connection attempt.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a reconnect timer is armed.
    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_timer.is_some()
    }

    /// Buffered bytes of an incomplete inbound frame.
    pub fn residual(&self) -> &[u8] {
        self.framing.residual()
    }

    pub fn target(&self) -> String {
        self.connector.target()
    }

    /// Start a connection attempt.
    ///
    /// Ignored unless the link is disconnected, so at most one attempt is
    /// ever outstanding.
    pub fn connect(&mut self) {
        if self.state != LinkState::Disconnected {
            tracing::debug!(state = ?self.state, "Connect ignored, attempt already in progress");
            return;
        }

        self.generation += 1;
        self.set_state(LinkState::Connecting);
        self.framing.reset();

        tracing::info!(
            target_addr = %self.connector.target(),
            generation = self.generation,
            "Connecting to controller"
        );

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        self.outbound = Some(outbound_tx);
        self.io_task = Some(tokio::spawn(run_connection(
            Arc::clone(&self.connector),
            self.generation,
            self.events.clone(),
            outbound_rx,
        )));
    }

    /// Apply an event from the link's background tasks.
    pub fn handle_event(&mut self, event: LinkEvent) -> Vec<LinkNotification> {
        match event {
            LinkEvent::Connected { generation } => {
                if self.is_stale(generation) || self.state != LinkState::Connecting {
                    return Vec::new();
                }
                self.set_state(LinkState::Connected);
                self.cancel_reconnect();
                tracing::info!(
                    target_addr = %self.connector.target(),
                    generation,
                    "Connected to controller"
                );
                vec![LinkNotification::Connected]
            }
            LinkEvent::Data { generation, bytes } => {
                if self.is_stale(generation) {
                    return Vec::new();
                }
                self.on_data(&bytes)
            }
            LinkEvent::Closed { generation, error } => {
                if self.is_stale(generation) || self.state == LinkState::Disconnected {
                    return Vec::new();
                }
                match error {
                    Some(e) => tracing::warn!(generation, error = %e, "Controller connection failed"),
                    None => tracing::info!(generation, "Controller connection closed"),
                }
                self.set_state(LinkState::Disconnected);
                self.outbound = None;
                self.io_task = None;
                self.framing.reset();
                self.schedule_reconnect();
                vec![LinkNotification::Disconnected]
            }
            LinkEvent::ReconnectDue => {
                self.reconnect_timer = None;
                self.connect();
                Vec::new()
            }
        }
    }

    /// Feed raw bytes through framing and the codec.
    ///
    /// Frames that fail to decode are logged and dropped; the connection is
    /// unaffected. The trailing partial frame stays buffered.
    pub fn on_data(&mut self, bytes: &[u8]) -> Vec<LinkNotification> {
        self.framing
            .push(bytes)
            .into_iter()
            .filter_map(|frame| {
                let text = match std::str::from_utf8(&frame) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(error = %e, "Dropping non UTF-8 frame from controller");
                        return None;
                    }
                };
                match protocol::decode(text) {
                    Ok(message) => {
                        tracing::debug!(command = %message.command(), node_mac = %message.node_mac(), "Received from controller");
                        Some(LinkNotification::Message(message))
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, frame = %text, "Dropping undecodable frame from controller");
                        None
                    }
                }
            })
            .collect()
    }

    /// Encode and queue a message for the controller.
    ///
    /// Only succeeds while connected. Delivery is not confirmed; a failed
    /// send is not retried.
    pub fn send_command(&self, message: &ProtocolMessage) -> Result<(), SendError> {
        if self.state != LinkState::Connected {
            tracing::warn!(command = %message.command(), "Cannot send command: not connected to controller");
            return Err(SendError::NotConnected);
        }
        let Some(outbound) = &self.outbound else {
            return Err(SendError::NotConnected);
        };

        let text = protocol::encode(message);
        let mut frame = Vec::with_capacity(text.len() + 1);
        self.framing.encode_frame(&text, &mut frame);

        outbound.send(frame).map_err(|_| {
            tracing::warn!(command = %message.command(), "Cannot send command: controller connection closed");
            SendError::ConnectionClosed
        })?;

        tracing::debug!(command = %message.command(), node_mac = %message.node_mac(), "Sent to controller");
        Ok(())
    }

    /// Close the active socket and cancel any pending reconnect.
    pub fn disconnect(&mut self) {
        if let Some(task) = self.io_task.take() {
            task.abort();
        }
        self.cancel_reconnect();
        self.outbound = None;
        self.framing.reset();
        // Anything still in flight from the old attempt is now stale.
        self.generation += 1;
        if self.state != LinkState::Disconnected {
            self.set_state(LinkState::Disconnected);
        }
        tracing::info!("Controller link shut down");
    }

    fn schedule_reconnect(&mut self) {
        if self.reconnect_timer.is_some() {
            return;
        }
        let delay = self.reconnect_delay;
        let events = self.events.clone();
        tracing::info!(delay_secs = delay.as_secs_f64(), "Reconnecting to controller after delay");
        self.reconnect_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(LinkEvent::ReconnectDue);
        }));
    }

    fn cancel_reconnect(&mut self) {
        if let Some(timer) = self.reconnect_timer.take() {
            timer.abort();
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        if generation != self.generation {
            tracing::trace!(generation, current = self.generation, "Ignoring stale link event");
            return true;
        }
        false
    }

    fn set_state(&mut self, next: LinkState) {
        if let Err(e) = self.state.transition_to(next) {
            tracing::error!(error = %e, "Unexpected link state transition");
        }
        self.state = next;
    }
}

impl Drop for HardwareLink {
    fn drop(&mut self) {
        if let Some(task) = self.io_task.take() {
            task.abort();
        }
        self.cancel_reconnect();
    }
}
