//! Application layer - the gateway actor and its process wiring.
//!
//! - [`gateway`] - Single task owning device state, clients and the hardware link
//! - [`server`] - Binds the actor to a WebSocket listener and a controller connector

mod error;
pub mod gateway;
pub mod server;

pub use error::GatewayError;
pub use gateway::Gateway;
pub use server::run;
