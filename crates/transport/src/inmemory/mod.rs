//! Single-process reference transports.
//!
//! Used by the worker and client test suites, and by `lightbus-cli shell`
//! for a zero-dependency local bus. Delivery semantics (single RPC delivery,
//! per-group event fan-out) are modelled faithfully; lease expiry and
//! redelivery are not, since there is no second process to crash — the
//! Redis transport is what the reclaim-pass tests exercise.

mod event;
mod result;
mod rpc;
mod schema;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;

use lightbus_message::{EventMessage, ResultMessage, RpcMessage};

use crate::{Delivery, LeaseAck, TransportError};

pub use event::InMemoryEventTransport;
pub use result::InMemoryResultTransport;
pub use rpc::InMemoryRpcTransport;
pub use schema::InMemorySchemaTransport;

const CONSUMER_QUEUE_DEPTH: usize = 256;

/// No-op lease acknowledgement: the in-memory bus never redelivers (no
/// second process can crash mid-handling), so acknowledging is bookkeeping
/// only, kept for interface parity with the Redis realisation.
struct NoopAck;

#[async_trait]
impl LeaseAck for NoopAck {
    async fn acknowledge(self: Box<Self>) -> Result<(), TransportError> {
        Ok(())
    }
}

struct RoundRobin<T> {
    senders: Vec<mpsc::Sender<T>>,
    next: AtomicUsize,
}

impl<T> RoundRobin<T> {
    fn new() -> Self {
        Self { senders: Vec::new(), next: AtomicUsize::new(0) }
    }

    fn push(&mut self, sender: mpsc::Sender<T>) {
        self.senders.push(sender);
    }

    fn pick(&self) -> Option<&mpsc::Sender<T>> {
        if self.senders.is_empty() {
            return None;
        }
        let i = self.next.fetch_add(1, std::sync::atomic::Ordering::Relaxed) % self.senders.len();
        self.senders.get(i)
    }
}

/// A single-process broker standing in for Redis in tests: one bus, all
/// four transports, backed by in-process channels.
pub struct InMemoryBus {
    rpc_routes: DashMap<String, RoundRobin<Delivery<RpcMessage>>>,
    result_waiters: DashMap<String, mpsc::Sender<ResultMessage>>,
    event_routes: DashMap<String, RoundRobin<Delivery<EventMessage>>>,
    /// `"api_name|event_name"` -> every distinct `listener_name` subscribed,
    /// so `send_event` can fan out once per group without the caller telling
    /// it who's listening.
    event_listener_index: DashMap<String, Vec<String>>,
    schemas: DashMap<String, schema::StoredSchema>,
}

impl InMemoryBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rpc_routes: DashMap::new(),
            result_waiters: DashMap::new(),
            event_routes: DashMap::new(),
            event_listener_index: DashMap::new(),
            schemas: DashMap::new(),
        })
    }

    pub fn rpc_transport(self: &Arc<Self>) -> InMemoryRpcTransport {
        InMemoryRpcTransport::new(Arc::clone(self))
    }

    pub fn result_transport(self: &Arc<Self>) -> InMemoryResultTransport {
        InMemoryResultTransport::new(Arc::clone(self))
    }

    pub fn event_transport(self: &Arc<Self>) -> InMemoryEventTransport {
        InMemoryEventTransport::new(Arc::clone(self))
    }

    pub fn schema_transport(self: &Arc<Self>) -> InMemorySchemaTransport {
        InMemorySchemaTransport::new(Arc::clone(self))
    }
}
