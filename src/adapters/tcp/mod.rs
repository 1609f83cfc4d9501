//! TCP adapters for the hardware controller.
//!
//! - [`connector`] - `TcpConnector`, the production `ControllerConnector`
//! - [`link`] - `HardwareLink`, the reconnecting connection state machine
//! - `connection` - per-attempt socket I/O task

mod connection;
pub mod connector;
pub mod link;

pub use connector::TcpConnector;
pub use link::{
    HardwareLink, LinkEvent, LinkNotification, LinkState, SendError, DEFAULT_RECONNECT_DELAY,
};
