//! TCP implementation of the controller connector port.

use std::io;

use async_trait::async_trait;
use tokio::net::TcpStream;

use crate::ports::{BoxedControllerStream, ControllerConnector};

/// Connects to the controller over plain TCP.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    host: String,
    port: u16,
}

impl TcpConnector {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

#[async_trait]
impl ControllerConnector for TcpConnector {
    async fn connect(&self) -> io::Result<BoxedControllerStream> {
        let stream = TcpStream::connect((self.host.as_str(), self.port)).await?;
        stream.set_nodelay(true)?;
        Ok(Box::new(stream))
    }

    fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
