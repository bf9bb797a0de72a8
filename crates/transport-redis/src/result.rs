use async_trait::async_trait;
use redis::AsyncCommands;

use lightbus_codec::{Codec, JsonCodec};
use lightbus_message::{ResultMessage, ReturnPath, RpcMessage};
use lightbus_transport::{ResultTransport, TransportError};

use crate::conn::RedisConn;
use crate::error::RedisTransportError;

fn result_key(return_path: &ReturnPath) -> String {
    format!("lightbus:result:{}", return_path.as_str())
}

/// Short-lived reply list keyed by the caller's `return_path`.
/// The responder `LPUSH`es once; the caller `BRPOP`s the same key and the
/// key is left to expire on its own (a single read drains it).
pub struct RedisResultTransport {
    conn: RedisConn,
    codec: JsonCodec,
}

impl RedisResultTransport {
    pub fn new(conn: RedisConn) -> Self {
        Self { conn, codec: JsonCodec }
    }
}

#[async_trait]
impl ResultTransport for RedisResultTransport {
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
        let bytes = self.codec.encode_result(&result_message).map_err(RedisTransportError::from)?;
        let key = result_key(return_path);
        let mut conn = self.conn.handle();
        // One result per call; a short expiry keeps abandoned keys (caller
        // already timed out) from lingering.
        conn.lpush::<_, _, ()>(&key, bytes).await.map_err(RedisTransportError::from)?;
        conn.expire::<_, ()>(&key, 60).await.map_err(RedisTransportError::from)?;
        Ok(())
    }

    async fn receive_result(
        &self,
        _rpc_message: &RpcMessage,
        return_path: &ReturnPath,
        timeout: std::time::Duration,
    ) -> Result<ResultMessage, TransportError> {
        let key = result_key(return_path);
        let mut conn = self.conn.handle();
        let popped: Option<(String, Vec<u8>)> = conn
            .brpop(&key, timeout.as_secs_f64().max(0.001))
            .await
            .map_err(RedisTransportError::from)?;
        let (_key, bytes) = popped.ok_or(TransportError::Timeout)?;
        self.codec.decode_result(&bytes).map_err(|e| RedisTransportError::from(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_key_is_namespaced_by_return_path() {
        assert_eq!(result_key(&ReturnPath::new("reply:abc")), "lightbus:result:reply:abc");
    }
}
