//! Adapters - Implementations of port interfaces and transport edges.
//!
//! - `tcp` - Controller connector and the reconnecting hardware link
//! - `websocket` - Client-facing WebSocket endpoint

pub mod tcp;
pub mod websocket;

pub use tcp::{HardwareLink, LinkEvent, LinkNotification, LinkState, SendError, TcpConnector};
pub use websocket::{websocket_router, ClientEvent, ClientId, ClientRegistry, WebSocketState};
