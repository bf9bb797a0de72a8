use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use lightbus_message::{ResultMessage, ReturnPath, RpcMessage};

use crate::{ResultTransport, TransportError};

/// In-memory realisation of [`ResultTransport`]: a result written to
/// `return_path` is handed directly to whichever `receive_result` call is
/// currently waiting on that path, mirroring the Redis realisation's
/// short-lived reply key.
pub struct InMemoryResultTransport {
    bus: Arc<super::InMemoryBus>,
}

impl InMemoryResultTransport {
    pub(super) fn new(bus: Arc<super::InMemoryBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl ResultTransport for InMemoryResultTransport {
    async fn open(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn send_result(
        &self,
        _rpc_message: &RpcMessage,
        result_message: ResultMessage,
        return_path: &ReturnPath,
    ) -> Result<(), TransportError> {
        // A missing waiter means the caller already gave up (timed out); the
        // result is silently dropped.
        if let Some((_, sender)) = self.bus.result_waiters.remove(return_path.as_str()) {
            let _ = sender.send(result_message).await;
        }
        Ok(())
    }

    async fn receive_result(
        &self,
        _rpc_message: &RpcMessage,
        return_path: &ReturnPath,
        timeout: Duration,
    ) -> Result<ResultMessage, TransportError> {
        let (tx, mut rx) = mpsc::channel(1);
        self.bus
            .result_waiters
            .insert(return_path.as_str().to_string(), tx);

        let outcome = tokio::time::timeout(timeout, rx.recv()).await;
        self.bus.result_waiters.remove(return_path.as_str());

        match outcome {
            Ok(Some(result)) => Ok(result),
            Ok(None) => Err(TransportError::Io("result sender dropped".to_string())),
            Err(_) => Err(TransportError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use lightbus_message::{Kwargs, Metadata};

    use super::*;

    fn rpc_message() -> RpcMessage {
        RpcMessage::new(
            lightbus_core::ApiName::new("auth"),
            lightbus_core::MemberName::new("login"),
            Kwargs::new(),
            ReturnPath::new("reply:1"),
            Metadata::new(),
        )
    }

    #[tokio::test]
    async fn delivers_a_result_to_the_waiting_receiver() {
        let bus = super::super::InMemoryBus::new();
        let transport = InMemoryResultTransport::new(bus.clone());
        let rpc = rpc_message();
        let path = rpc.return_path().clone();

        let sender_transport = InMemoryResultTransport::new(bus.clone());
        let rpc_id = rpc.id();
        let send_path = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            sender_transport
                .send_result(
                    &rpc,
                    ResultMessage::success(rpc_id, Value::Bool(true), Metadata::new()),
                    &send_path,
                )
                .await
                .unwrap();
        });

        let result = transport
            .receive_result(&rpc_message(), &path, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(result.rpc_message_id(), rpc_id);
    }

    #[tokio::test]
    async fn times_out_when_nothing_arrives() {
        let bus = super::super::InMemoryBus::new();
        let transport = InMemoryResultTransport::new(bus);
        let rpc = rpc_message();
        let result = transport
            .receive_result(&rpc, rpc.return_path(), Duration::from_millis(20))
            .await;
        assert!(matches!(result, Err(TransportError::Timeout)));
    }
}
