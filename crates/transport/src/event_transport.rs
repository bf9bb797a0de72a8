use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use lightbus_core::{ApiName, MemberName, ReplaySince};
use lightbus_message::EventMessage;

use crate::{Delivery, ListenerSpec, TransportError};

/// Per-fire knobs; currently empty, but kept distinct from the message
/// itself so transports can grow options (e.g. partition key) without
/// changing `send_event`'s signature.
#[derive(Debug, Clone, Default)]
pub struct EventSendOptions;

/// See [`crate::RpcConsumer`] for why the receiver sits behind a shared
/// mutex: replicas within one consumer group share the queue and compete
/// for entries exactly the way a Redis consumer group would partition them.
pub struct EventConsumer {
    rx: Arc<Mutex<mpsc::Receiver<Delivery<EventMessage>>>>,
}

impl EventConsumer {
    pub fn new(rx: Arc<Mutex<mpsc::Receiver<Delivery<EventMessage>>>>) -> Self {
        Self { rx }
    }

    pub async fn recv(&mut self) -> Option<Delivery<EventMessage>> {
        self.rx.lock().await.recv().await
    }
}

impl Clone for EventConsumer {
    fn clone(&self) -> Self {
        Self { rx: Arc::clone(&self.rx) }
    }
}

/// Fan-out with consumer groups.
#[async_trait]
pub trait EventTransport: Send + Sync {
    async fn open(&self) -> Result<(), TransportError>;
    async fn close(&self) -> Result<(), TransportError>;

    /// Append to the per-`api_name` stream. Returns only once the broker has
    /// durably accepted the message.
    async fn send_event(&self, message: EventMessage, options: EventSendOptions) -> Result<(), TransportError>;

    /// Start or rejoin one consumer group per `ListenerSpec::listener_name`.
    async fn consume(&self, listeners: &[ListenerSpec]) -> Result<EventConsumer, TransportError>;

    /// Replay history for one event, if the backend supports it.
    async fn history(
        &self,
        api_name: &ApiName,
        event_name: &MemberName,
        since: ReplaySince,
        until: Option<ReplaySince>,
    ) -> Result<Vec<EventMessage>, TransportError> {
        let _ = (api_name, event_name, since, until);
        Err(TransportError::Unsupported("history".to_string()))
    }

    /// Periodic reclaim of pending entries older than `older_than` belonging
    /// to `listener_name`, reassigned to this replica.
    async fn reclaim(&self, listener_name: &str, older_than: std::time::Duration) -> Result<usize, TransportError>;

    /// Route an entry that exceeded `max_redeliveries` to a dead-letter path
    /// and consider it handled. The default no-op suits
    /// transports (like [`inmemory`]) that never model redelivery; the
    /// Redis realisation appends to a side stream.
    async fn dead_letter(&self, message: &EventMessage, delivery_count: u32) -> Result<(), TransportError> {
        let _ = (message, delivery_count);
        Ok(())
    }
}
