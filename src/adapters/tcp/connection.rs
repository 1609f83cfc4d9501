//! Per-attempt I/O task for the controller link.
//!
//! One task is spawned per connection attempt. It opens the stream through
//! the connector, then shuttles bytes: reads become [`LinkEvent::Data`],
//! queued outbound frames are written in order. Any read or write error, or
//! EOF, ends the task with a single [`LinkEvent::Closed`].

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::ports::ControllerConnector;

use super::link::LinkEvent;

const READ_BUFFER_SIZE: usize = 8 * 1024;

pub(super) async fn run_connection(
    connector: Arc<dyn ControllerConnector>,
    generation: u64,
    events: UnboundedSender<LinkEvent>,
    mut outbound: UnboundedReceiver<Vec<u8>>,
) {
    let stream = match connector.connect().await {
        Ok(stream) => stream,
        Err(e) => {
            let _ = events.send(LinkEvent::Closed {
                generation,
                error: Some(e.to_string()),
            });
            return;
        }
    };

    if events.send(LinkEvent::Connected { generation }).is_err() {
        return;
    }

    let (mut reader, mut writer) = tokio::io::split(stream);
    let mut buf = vec![0u8; READ_BUFFER_SIZE];

    let error = loop {
        tokio::select! {
            read = reader.read(&mut buf) => match read {
                Ok(0) => break None,
                Ok(n) => {
                    let data = LinkEvent::Data { generation, bytes: buf[..n].to_vec() };
                    if events.send(data).is_err() {
                        return;
                    }
                }
                Err(e) => break Some(e.to_string()),
            },
            frame = outbound.recv() => match frame {
                Some(bytes) => {
                    if let Err(e) = writer.write_all(&bytes).await {
                        break Some(e.to_string());
                    }
                }
                None => break None,
            },
        }
    };

    // Tear the socket down before reporting so a reconnect never overlaps it.
    let _ = writer.shutdown().await;
    drop(writer);
    drop(reader);

    let _ = events.send(LinkEvent::Closed { generation, error });
}
