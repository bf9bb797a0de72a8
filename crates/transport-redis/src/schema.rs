use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use lightbus_core::ApiName;
use lightbus_schema::ApiSchema;
use lightbus_transport::{SchemaTransport, TransportError};

use crate::conn::RedisConn;
use crate::error::RedisTransportError;

fn schema_key(api_name: &str) -> String {
    format!("lightbus:schema:{api_name}")
}

/// Schema pub/get with a TTL: a plain string key holding
/// the serialized `ApiSchema`, refreshed periodically by the owning client
/// so the entry disappears if that client stops publishing.
pub struct RedisSchemaTransport {
    conn: RedisConn,
}

impl RedisSchemaTransport {
    pub fn new(conn: RedisConn) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SchemaTransport for RedisSchemaTransport {
    async fn open(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn store(&self, api_name: &ApiName, schema: &ApiSchema, ttl: Duration) -> Result<(), TransportError> {
        let bytes = serde_json::to_vec(schema).map_err(|e| TransportError::InvalidMessage(e.to_string()))?;
        let mut conn = self.conn.handle();
        conn.set_ex::<_, _, ()>(schema_key(api_name.as_str()), bytes, ttl.as_secs().max(1))
            .await
            .map_err(RedisTransportError::from)?;
        Ok(())
    }

    async fn load(&self, api_name: &ApiName) -> Result<Option<ApiSchema>, TransportError> {
        let mut conn = self.conn.handle();
        let bytes: Option<Vec<u8>> = conn.get(schema_key(api_name.as_str())).await.map_err(RedisTransportError::from)?;
        match bytes {
            Some(bytes) => {
                let schema = serde_json::from_slice(&bytes).map_err(|e| TransportError::InvalidMessage(e.to_string()))?;
                Ok(Some(schema))
            }
            None => Ok(None),
        }
    }

    async fn ping(&self, api_name: &ApiName, ttl: Duration) -> Result<(), TransportError> {
        let mut conn = self.conn.handle();
        conn.expire::<_, ()>(schema_key(api_name.as_str()), ttl.as_secs().max(1) as i64)
            .await
            .map_err(RedisTransportError::from)?;
        Ok(())
    }
}
