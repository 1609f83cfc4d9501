//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the gateway and the outside world. Adapters implement these ports.
//!
//! - `ControllerConnector` - Opens the byte stream to the hardware controller

mod controller_connector;

pub use controller_connector::{BoxedControllerStream, ControllerConnector, ControllerStream};
