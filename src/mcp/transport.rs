/// Outbound message channel
///
/// The dispatcher and every running tool call emit replies through a
/// `MessageSink`. Sending is fire-and-forget: nothing waits for delivery.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::mcp::protocol::JsonRpcResponse;

/// Capability to transmit one protocol message to the remote peer
pub trait MessageSink: Send + Sync {
    /// Hand a serialized message to the transport
    fn send(&self, message: String);

    /// Serialize and send a reply
    fn send_reply(&self, reply: &JsonRpcResponse) {
        match serde_json::to_string(reply) {
            Ok(message) => self.send(message),
            Err(e) => error!("Failed to serialize reply for id {}: {}", reply.id, e),
        }
    }
}

/// Sink backed by an unbounded channel, drained by a writer task
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { sender }
    }

    /// Create a sink together with the receiving end of its channel
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl MessageSink for ChannelSink {
    fn send(&self, message: String) {
        if self.sender.send(message).is_err() {
            warn!("Outbound channel closed, dropping message");
        }
    }
}

/// Write every queued message as one line, until all senders are gone
pub async fn write_lines<W>(
    mut receiver: mpsc::UnboundedReceiver<String>,
    mut writer: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = receiver.recv().await {
        // Write response + newline
        writer.write_all(message.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        debug!("Sent message: {}", message);
    }
    Ok(())
}
