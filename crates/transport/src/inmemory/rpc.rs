use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use lightbus_core::ApiName;
use lightbus_message::RpcMessage;

use crate::{Delivery, Lease, RpcConsumer, RpcTransport, TransportError};

use super::{NoopAck, RoundRobin, CONSUMER_QUEUE_DEPTH};

/// In-memory realisation of [`RpcTransport`]: publishes round-robin across
/// every consumer registered for an `api_name`, giving single delivery among
/// competing workers the same way a Redis blocking-list pop would.
pub struct InMemoryRpcTransport {
    bus: Arc<super::InMemoryBus>,
}

impl InMemoryRpcTransport {
    pub(super) fn new(bus: Arc<super::InMemoryBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl RpcTransport for InMemoryRpcTransport {
    async fn open(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn publish(&self, message: RpcMessage) -> Result<(), TransportError> {
        let key = message.api_name().as_str().to_string();
        let route = self.bus.rpc_routes.get(&key);
        let Some(route) = route else {
            return Err(TransportError::NoResponders(key));
        };
        let Some(sender) = route.pick() else {
            return Err(TransportError::NoResponders(key));
        };
        let lease = Lease::new(1, Box::new(NoopAck));
        sender
            .send(Delivery::new(message, lease))
            .await
            .map_err(|_| TransportError::Io("consumer channel closed".to_string()))
    }

    async fn consume(&self, api_names: &[ApiName], _concurrency: usize) -> Result<RpcConsumer, TransportError> {
        let (tx, rx) = mpsc::channel(CONSUMER_QUEUE_DEPTH);
        for api_name in api_names {
            self.bus
                .rpc_routes
                .entry(api_name.as_str().to_string())
                .or_insert_with(RoundRobin::new)
                .push(tx.clone());
        }
        Ok(RpcConsumer::new(Arc::new(tokio::sync::Mutex::new(rx))))
    }
}

#[cfg(test)]
mod tests {
    use lightbus_message::{Kwargs, Metadata, ReturnPath};

    use super::*;

    #[tokio::test]
    async fn single_delivery_among_two_consumers() {
        let bus = super::super::InMemoryBus::new();
        let transport = InMemoryRpcTransport::new(bus.clone());
        let mut a = transport.consume(&[ApiName::new("auth")], 10).await.unwrap();
        let mut b = transport.consume(&[ApiName::new("auth")], 10).await.unwrap();

        for _ in 0..4 {
            transport
                .publish(RpcMessage::new(
                    ApiName::new("auth"),
                    lightbus_core::MemberName::new("login"),
                    Kwargs::new(),
                    ReturnPath::new("reply:1"),
                    Metadata::new(),
                ))
                .await
                .unwrap();
        }

        let mut total = 0;
        for _ in 0..4 {
            tokio::select! {
                Some(_) = a.recv() => total += 1,
                Some(_) = b.recv() => total += 1,
            }
        }
        assert_eq!(total, 4);
    }
}
