//! Chat Transport
//!
//! The seam between the game and whatever chat system delivers messages.
//! The game only needs ordered, fire-and-forget sends and a delay primitive.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::network::protocol::OutgoingMessage;

/// Transport failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The other side has gone away.
    #[error("Transport closed")]
    Closed,

    /// Delivery failed.
    #[error("Send failed: {0}")]
    SendFailed(String),
}

/// Output channel towards the player.
pub trait ChatTransport: Send + Sync {
    /// Deliver a message. Messages arrive in send order.
    fn send(&self, message: OutgoingMessage)
        -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Wait before the next message.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Transport that forwards every message into an mpsc channel.
///
/// Used by bridges that pump messages to a real chat client, and by tests.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::Sender<OutgoingMessage>,
}

impl ChannelTransport {
    /// Wrap a sender.
    pub fn new(sender: mpsc::Sender<OutgoingMessage>) -> Self {
        Self { sender }
    }

    /// Create a transport and the receiving end of its channel.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<OutgoingMessage>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }
}

impl ChatTransport for ChannelTransport {
    async fn send(&self, message: OutgoingMessage) -> Result<(), TransportError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| TransportError::Closed)
    }
}
