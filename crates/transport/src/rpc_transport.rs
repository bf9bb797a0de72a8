use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use lightbus_core::ApiName;
use lightbus_message::RpcMessage;

use crate::{Delivery, TransportError};

/// A consumer subscription yielded by [`RpcTransport::consume`]: a lazy
/// sequence of `(RpcMessage, Lease)` pairs.
///
/// The receiver is held behind a shared mutex rather than owned outright so
/// several `RpcConsumer` handles (e.g. several worker tasks in the same
/// process) can race for the same underlying queue and still observe
/// single delivery — whichever task holds the lock when a message arrives
/// gets it, the rest keep waiting.
pub struct RpcConsumer {
    rx: Arc<Mutex<mpsc::Receiver<Delivery<RpcMessage>>>>,
}

impl RpcConsumer {
    pub fn new(rx: Arc<Mutex<mpsc::Receiver<Delivery<RpcMessage>>>>) -> Self {
        Self { rx }
    }

    pub async fn recv(&mut self) -> Option<Delivery<RpcMessage>> {
        self.rx.lock().await.recv().await
    }
}

impl Clone for RpcConsumer {
    fn clone(&self) -> Self {
        Self { rx: Arc::clone(&self.rx) }
    }
}

/// Producer/consumer side of RPC dispatch.
///
/// Concrete backends must guarantee single delivery among competing
/// consumers subscribed to the same `api_name`.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn open(&self) -> Result<(), TransportError>;
    async fn close(&self) -> Result<(), TransportError>;

    /// Enqueue `message`, routed to subscribers of its `api_name`.
    async fn publish(&self, message: RpcMessage) -> Result<(), TransportError>;

    /// Subscribe as a worker for the given APIs. `concurrency` bounds how
    /// many undelivered messages the transport may prefetch ahead of the
    /// dispatcher's backpressure window.
    async fn consume(&self, api_names: &[ApiName], concurrency: usize) -> Result<RpcConsumer, TransportError>;
}
