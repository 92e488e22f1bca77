//! Async inbound message bus.
//!
//! Channels publish [`InboundMessage`]s; the dispatcher is the single
//! consumer. The bus decouples platform polling from conversation handling.

use crate::error::{BusError, BusResult};
use crate::events::InboundMessage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, mpsc};
use tracing::trace;

/// Default capacity for the inbound queue.
const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Async message bus carrying inbound messages from channels to the core.
#[derive(Clone)]
pub struct MessageBus {
    inner: Arc<MessageBusInner>,
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus").finish_non_exhaustive()
    }
}

struct MessageBusInner {
    inbound_tx: mpsc::Sender<InboundMessage>,
    inbound_rx: Mutex<mpsc::Receiver<InboundMessage>>,
    stats: RwLock<BusStats>,
}

/// Message bus statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct BusStats {
    /// Total inbound messages published.
    pub inbound_count: u64,
    /// Total inbound messages consumed.
    pub consumed_count: u64,
}

impl MessageBus {
    /// Create a new message bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a new message bus with the given queue capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(capacity.max(1));
        Self {
            inner: Arc::new(MessageBusInner {
                inbound_tx,
                inbound_rx: Mutex::new(inbound_rx),
                stats: RwLock::new(BusStats::default()),
            }),
        }
    }

    /// Publish an inbound message from a channel.
    pub async fn publish_inbound(&self, msg: InboundMessage) -> BusResult<()> {
        trace!(
            channel = %msg.channel,
            sender = %msg.sender_id,
            "publishing inbound message"
        );

        self.inner
            .inbound_tx
            .send(msg)
            .await
            .map_err(|_| BusError::InboundClosed)?;

        self.inner.stats.write().await.inbound_count += 1;
        Ok(())
    }

    /// Consume the next inbound message. Returns `None` when the bus is
    /// closed.
    pub async fn consume_inbound(&self) -> Option<InboundMessage> {
        let msg = self.inner.inbound_rx.lock().await.recv().await;
        if msg.is_some() {
            self.inner.stats.write().await.consumed_count += 1;
        }
        msg
    }

    /// Consume the next inbound message, giving up after `timeout`.
    pub async fn consume_inbound_timeout(&self, timeout: Duration) -> Option<InboundMessage> {
        tokio::time::timeout(timeout, self.consume_inbound())
            .await
            .ok()
            .flatten()
    }

    /// Current bus statistics.
    pub async fn stats(&self) -> BusStats {
        *self.inner.stats.read().await
    }

    /// Create a lightweight handle for publishing inbound messages.
    pub fn inbound_handle(&self) -> InboundHandle {
        InboundHandle {
            tx: self.inner.inbound_tx.clone(),
        }
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Lightweight handle for publishing inbound messages.
#[derive(Debug, Clone)]
pub struct InboundHandle {
    tx: mpsc::Sender<InboundMessage>,
}

impl InboundHandle {
    /// Publish an inbound message.
    pub async fn publish(&self, msg: InboundMessage) -> BusResult<()> {
        self.tx.send(msg).await.map_err(|_| BusError::InboundClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inbound_message_flow() {
        let bus = MessageBus::new();

        let msg = InboundMessage::new("test", "sender1", "chat1", "Hello");
        bus.publish_inbound(msg).await.unwrap();

        let received = bus.consume_inbound_timeout(Duration::from_millis(100)).await;
        assert_eq!(received.unwrap().content, "Hello");
    }

    #[tokio::test]
    async fn test_handle_preserves_order() {
        let bus = MessageBus::new();
        let handle = bus.inbound_handle();

        for text in ["/start", "1", "3"] {
            handle
                .publish(InboundMessage::new("test", "s", "c", text))
                .await
                .unwrap();
        }

        let mut seen = Vec::new();
        while let Some(msg) = bus.consume_inbound_timeout(Duration::from_millis(50)).await {
            seen.push(msg.content);
        }
        assert_eq!(seen, ["/start", "1", "3"]);
    }

    #[tokio::test]
    async fn test_timeout_on_empty_bus() {
        let bus = MessageBus::new();
        assert!(
            bus.consume_inbound_timeout(Duration::from_millis(10))
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_stats() {
        let bus = MessageBus::new();
        bus.publish_inbound(InboundMessage::new("test", "s", "c", "in"))
            .await
            .unwrap();
        bus.consume_inbound().await.unwrap();

        let stats = bus.stats().await;
        assert_eq!(stats.inbound_count, 1);
        assert_eq!(stats.consumed_count, 1);
    }
}
