//! Outbound side of the stdio connection.
//!
//! Request tasks never touch stdout directly: they push responses through a
//! bounded mpsc channel drained by a single writer task, so each response is
//! written as one whole line.

use retable_mcp_core::messages::JsonRpcResponse;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Message queued for the writer task.
#[derive(Debug)]
pub enum OutboundMessage {
    /// A response, written as one JSON line.
    Response(JsonRpcResponse),
    /// Flush and stop the writer.
    Close,
}

/// Error returned when queueing a response fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The writer task has exited; the receiver was dropped.
    #[error("outbound writer has shut down")]
    Disconnected,
}

/// Sender side handed to every request task.
#[derive(Debug, Clone)]
pub struct OutboundHandle {
    tx: mpsc::Sender<OutboundMessage>,
}

impl OutboundHandle {
    /// Creates the handle and the receiver for [`write_loop`].
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Queues a response, waiting for channel space.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Disconnected`] if the writer has already exited.
    pub async fn send(&self, response: JsonRpcResponse) -> Result<(), SendError> {
        self.tx
            .send(OutboundMessage::Response(response))
            .await
            .map_err(|_| SendError::Disconnected)
    }

    /// Asks the writer to flush and stop once everything queued before it is out.
    pub async fn close(&self) {
        // Already gone means already closed.
        let _ = self.tx.send(OutboundMessage::Close).await;
    }
}

/// Writes queued responses as newline-delimited JSON until `Close` arrives
/// or every sender is dropped. Returns the number of responses written.
///
/// # Errors
///
/// Returns the underlying I/O error if writing or flushing fails.
pub async fn write_loop<W>(
    mut rx: mpsc::Receiver<OutboundMessage>,
    mut writer: W,
) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(message) = rx.recv().await {
        let response = match message {
            OutboundMessage::Response(response) => response,
            OutboundMessage::Close => break,
        };
        let mut line = match serde_json::to_vec(&response) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "dropping unserializable response");
                continue;
            }
        };
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
        written += 1;
    }
    rx.close();
    writer.flush().await?;
    debug!(written, "outbound writer stopped");
    Ok(written)
}
