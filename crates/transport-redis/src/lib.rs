//! Redis realisation of the four transport traits: blocking lists for RPC
//! dispatch and results, Streams with consumer groups for event fan-out,
//! and a TTL'd string key for schema pub/get. Built against `redis`'s
//! async, tokio-backed API rather than thread-and-blocking-connection
//! polling.

mod conn;
mod error;
mod event;
mod result;
mod rpc;
mod schema;

pub use conn::RedisConn;
pub use error::RedisTransportError;
pub use event::RedisEventTransport;
pub use result::RedisResultTransport;
pub use rpc::RedisRpcTransport;
pub use schema::RedisSchemaTransport;

use std::sync::Arc;

use lightbus_transport::{EventTransport, ResultTransport, RpcTransport, SchemaTransport, TransportError};

/// Opens one shared connection and wraps it in all four transport traits,
/// the way `lightbus-client`'s lifecycle manager wants to consume them.
pub struct RedisTransports {
    pub rpc: Arc<dyn RpcTransport>,
    pub result: Arc<dyn ResultTransport>,
    pub event: Arc<dyn EventTransport>,
    pub schema: Arc<dyn SchemaTransport>,
}

impl RedisTransports {
    pub async fn connect(redis_url: &str) -> Result<Self, TransportError> {
        let conn = RedisConn::connect(redis_url).await.map_err(Into::<TransportError>::into)?;
        Ok(Self {
            rpc: Arc::new(RedisRpcTransport::new(conn.clone())),
            result: Arc::new(RedisResultTransport::new(conn.clone())),
            event: Arc::new(RedisEventTransport::new(conn.clone())),
            schema: Arc::new(RedisSchemaTransport::new(conn)),
        })
    }
}
