//! Lighting Gateway - WebSocket to TCP bridge for street-lighting controllers
//!
//! Clients speak a JSON command protocol over WebSocket. The gateway relays
//! every command to a single hardware controller over a reconnecting TCP
//! link, keeps an optimistic view of device state, and fans controller
//! acknowledgements back out to all clients.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
