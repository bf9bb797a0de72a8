use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use lightbus_core::{ApiName, MemberName, ReplaySince};
use lightbus_message::EventMessage;

use crate::{Delivery, EventConsumer, EventSendOptions, EventTransport, Lease, ListenerSpec, TransportError};

use super::{NoopAck, RoundRobin, CONSUMER_QUEUE_DEPTH};

fn address_key(api_name: &str, event_name: &str) -> String {
    format!("{api_name}|{event_name}")
}

fn group_key(listener_name: &str, api_name: &str, event_name: &str) -> String {
    format!("{listener_name}|{api_name}|{event_name}")
}

/// In-memory realisation of [`EventTransport`]: every distinct
/// `listener_name` subscribed to an address gets its own round-robin group,
/// so a `fire` fans out once per group and load-balances within it —
/// exactly the semantics a Redis Streams consumer group provides.
pub struct InMemoryEventTransport {
    bus: Arc<super::InMemoryBus>,
}

impl InMemoryEventTransport {
    pub(super) fn new(bus: Arc<super::InMemoryBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl EventTransport for InMemoryEventTransport {
    async fn open(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn send_event(&self, message: EventMessage, _options: EventSendOptions) -> Result<(), TransportError> {
        let addr_key = address_key(message.api_name().as_str(), message.event_name().as_str());
        let Some(listeners) = self.bus.event_listener_index.get(&addr_key) else {
            return Ok(());
        };

        for listener_name in listeners.iter() {
            let key = group_key(listener_name, message.api_name().as_str(), message.event_name().as_str());
            if let Some(route) = self.bus.event_routes.get(&key) {
                if let Some(sender) = route.pick() {
                    let lease = Lease::new(1, Box::new(NoopAck));
                    let _ = sender.send(Delivery::new(message.clone(), lease)).await;
                }
            }
        }
        Ok(())
    }

    async fn consume(&self, listeners: &[ListenerSpec]) -> Result<EventConsumer, TransportError> {
        let (tx, rx) = mpsc::channel(CONSUMER_QUEUE_DEPTH);
        for spec in listeners {
            for (api_name, event_name) in &spec.addresses {
                let addr_key = address_key(api_name.as_str(), event_name.as_str());
                let mut entry = self.bus.event_listener_index.entry(addr_key).or_default();
                if !entry.contains(&spec.listener_name) {
                    entry.push(spec.listener_name.clone());
                }
                drop(entry);

                let key = group_key(&spec.listener_name, api_name.as_str(), event_name.as_str());
                self.bus
                    .event_routes
                    .entry(key)
                    .or_insert_with(RoundRobin::new)
                    .push(tx.clone());
            }
        }
        Ok(EventConsumer::new(Arc::new(tokio::sync::Mutex::new(rx))))
    }

    async fn history(
        &self,
        _api_name: &ApiName,
        _event_name: &MemberName,
        _since: ReplaySince,
        _until: Option<ReplaySince>,
    ) -> Result<Vec<EventMessage>, TransportError> {
        Err(TransportError::Unsupported("history".to_string()))
    }

    async fn reclaim(&self, _listener_name: &str, _older_than: Duration) -> Result<usize, TransportError> {
        // No crashed replicas to reclaim from in a single process.
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use lightbus_message::{Kwargs, Metadata};

    use super::*;

    fn spec(listener: &str) -> ListenerSpec {
        ListenerSpec::new(listener).with_address(ApiName::new("store"), MemberName::new("page_view"))
    }

    #[tokio::test]
    async fn every_distinct_group_gets_the_event_once() {
        let bus = super::super::InMemoryBus::new();
        let transport = InMemoryEventTransport::new(bus.clone());

        let mut audit = transport.consume(&[spec("audit")]).await.unwrap();
        let mut cache = transport.consume(&[spec("cache")]).await.unwrap();

        transport
            .send_event(
                EventMessage::new(ApiName::new("store"), MemberName::new("page_view"), Kwargs::new(), Metadata::new()),
                EventSendOptions::default(),
            )
            .await
            .unwrap();

        let a = tokio::time::timeout(Duration::from_millis(50), audit.recv()).await.unwrap();
        let c = tokio::time::timeout(Duration::from_millis(50), cache.recv()).await.unwrap();
        assert!(a.is_some());
        assert!(c.is_some());
    }

    #[tokio::test]
    async fn replicas_in_one_group_partition_deliveries() {
        let bus = super::super::InMemoryBus::new();
        let transport = InMemoryEventTransport::new(bus.clone());

        let mut r1 = transport.consume(&[spec("audit")]).await.unwrap();
        let mut r2 = transport.consume(&[spec("audit")]).await.unwrap();

        for _ in 0..4 {
            transport
                .send_event(
                    EventMessage::new(ApiName::new("store"), MemberName::new("page_view"), Kwargs::new(), Metadata::new()),
                    EventSendOptions::default(),
                )
                .await
                .unwrap();
        }

        let mut total = 0;
        for _ in 0..4 {
            tokio::select! {
                Some(_) = r1.recv() => total += 1,
                Some(_) = r2.recv() => total += 1,
            }
        }
        assert_eq!(total, 4);
    }
}
