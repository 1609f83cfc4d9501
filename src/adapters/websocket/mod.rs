//! WebSocket adapters for control clients.
//!
//! # Architecture
//!
//! ```text
//!   client A        client B        client C
//!      │               │               │
//!  ┌───┴───────────────┴───────────────┴───┐
//!  │  handler: reader task + writer task    │
//!  │  per connection                        │
//!  └───────────────────┬────────────────────┘
//!          ClientEvent │ ▲ per-client queue
//!                      ▼ │
//!  ┌────────────────────────────────────────┐
//!  │  Gateway actor (owns ClientRegistry)   │
//!  └────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - Events posted by connections to the gateway
//! - [`registry`] - Client IDs and per-client outbound queues
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod handler;
pub mod messages;
pub mod registry;

pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use messages::ClientEvent;
pub use registry::{ClientId, ClientRegistry, ClientSender};
