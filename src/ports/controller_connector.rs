//! ControllerConnector port - opens the byte stream to the hardware controller.
//!
//! The hardware link owns reconnect policy and framing; a connector only knows
//! how to produce one fresh duplex stream per attempt. Production uses TCP,
//! tests hand out in-memory `tokio::io::duplex` pipes.

use std::fmt;
use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

/// A bidirectional byte stream to the controller.
pub trait ControllerStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> ControllerStream for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

/// Boxed stream returned by a connector.
pub type BoxedControllerStream = Box<dyn ControllerStream>;

/// Port for establishing a connection to the hardware controller.
#[async_trait]
pub trait ControllerConnector: Send + Sync + fmt::Debug {
    /// Open a new connection. Each call is one connection attempt.
    async fn connect(&self) -> io::Result<BoxedControllerStream>;

    /// Human-readable target for logs (e.g. `host:port`).
    fn target(&self) -> String;
}
