use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, warn};

use lightbus_codec::{Codec, JsonCodec};
use lightbus_core::ApiName;
use lightbus_message::RpcMessage;
use lightbus_transport::{Delivery, Lease, LeaseAck, RpcConsumer, RpcTransport, TransportError};

use crate::conn::RedisConn;
use crate::error::RedisTransportError;

fn queue_key(api_name: &str) -> String {
    format!("lightbus:rpc:{api_name}")
}

/// `BRPOP` already removes the popped entry, so there is nothing left to
/// acknowledge by the time a handler runs; a crashed worker simply loses the
/// message rather than leaving it for redelivery — the same trade-off the
/// upstream Redis RPC transport makes for low-latency calls.
struct NoopAck;

#[async_trait]
impl LeaseAck for NoopAck {
    async fn acknowledge(self: Box<Self>) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Blocking-list RPC transport: `LPUSH` to
/// enqueue, `BRPOP` across every subscribed api's queue to dequeue, giving
/// single delivery among competing consumers for free.
pub struct RedisRpcTransport {
    conn: RedisConn,
    codec: JsonCodec,
}

impl RedisRpcTransport {
    pub fn new(conn: RedisConn) -> Self {
        Self { conn, codec: JsonCodec }
    }
}

#[async_trait]
impl RpcTransport for RedisRpcTransport {
    async fn open(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn publish(&self, message: RpcMessage) -> Result<(), TransportError> {
        let bytes = self.codec.encode_rpc(&message).map_err(RedisTransportError::from)?;
        let key = queue_key(message.api_name().as_str());
        let mut conn = self.conn.handle();
        conn.lpush::<_, _, ()>(key, bytes).await.map_err(RedisTransportError::from)?;
        Ok(())
    }

    async fn consume(&self, api_names: &[ApiName], concurrency: usize) -> Result<RpcConsumer, TransportError> {
        let keys: Vec<String> = api_names.iter().map(|a| queue_key(a.as_str())).collect();
        let (tx, rx) = mpsc::channel(concurrency.max(1));
        let conn = self.conn.handle();
        let codec = self.codec;

        tokio::spawn(async move {
            let mut conn = conn;
            loop {
                let popped: redis::RedisResult<Option<(String, Vec<u8>)>> =
                    conn.brpop(&keys, 1.0).await;
                match popped {
                    Ok(Some((_key, bytes))) => match codec.decode_rpc(&bytes) {
                        Ok(message) => {
                            let lease = Lease::new(1, Box::new(NoopAck));
                            if tx.send(Delivery::new(message, lease)).await.is_err() {
                                return;
                            }
                        }
                        Err(err) => error!(error = %err, "failed to decode rpc message from redis"),
                    },
                    Ok(None) => {}
                    Err(err) => {
                        warn!(error = %err, "brpop failed; retrying after a short delay");
                        tokio::time::sleep(Duration::from_millis(250)).await;
                    }
                }
            }
        });

        Ok(RpcConsumer::new(Arc::new(Mutex::new(rx))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_key_is_namespaced_by_api() {
        assert_eq!(queue_key("auth"), "lightbus:rpc:auth");
    }
}
