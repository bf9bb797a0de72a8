use std::sync::Arc;

use lightbus_core::{BusError, BusTransportConfig, TransportKind};
use lightbus_transport::inmemory::InMemoryBus;
use lightbus_transport::{EventTransport, ResultTransport, RpcTransport, SchemaTransport};
use lightbus_transport_redis::RedisTransports;

/// The four transport handles a [`lightbus_client::ClientBuilder`] needs,
/// picked independently per concern from `bus.*_transport`.
pub struct TransportHandles {
    pub rpc: Arc<dyn RpcTransport>,
    pub result: Arc<dyn ResultTransport>,
    pub event: Arc<dyn EventTransport>,
    pub schema: Arc<dyn SchemaTransport>,
}

/// Builds transport handles for `config`, connecting to Redis at most once
/// even if several concerns use it, and standing up at most one in-memory
/// bus even if several concerns use that instead.
pub async fn build(config: &BusTransportConfig) -> Result<TransportHandles, BusError> {
    let kinds = [
        config.rpc_transport,
        config.result_transport,
        config.event_transport,
        config.schema_transport,
    ];

    let memory_bus = if kinds.iter().any(|k| *k == TransportKind::InMemory) {
        Some(InMemoryBus::new())
    } else {
        None
    };

    let redis = if kinds.iter().any(|k| *k == TransportKind::Redis) {
        Some(
            RedisTransports::connect(&config.redis_url)
                .await
                .map_err(|err| BusError::transport_failure(err.to_string()))?,
        )
    } else {
        None
    };

    let rpc: Arc<dyn RpcTransport> = match config.rpc_transport {
        TransportKind::InMemory => Arc::new(memory_bus.as_ref().expect("in-memory bus built").rpc_transport()),
        TransportKind::Redis => Arc::clone(&redis.as_ref().expect("redis transports connected").rpc),
    };
    let result: Arc<dyn ResultTransport> = match config.result_transport {
        TransportKind::InMemory => Arc::new(memory_bus.as_ref().expect("in-memory bus built").result_transport()),
        TransportKind::Redis => Arc::clone(&redis.as_ref().expect("redis transports connected").result),
    };
    let event: Arc<dyn EventTransport> = match config.event_transport {
        TransportKind::InMemory => Arc::new(memory_bus.as_ref().expect("in-memory bus built").event_transport()),
        TransportKind::Redis => Arc::clone(&redis.as_ref().expect("redis transports connected").event),
    };
    let schema: Arc<dyn SchemaTransport> = match config.schema_transport {
        TransportKind::InMemory => Arc::new(memory_bus.as_ref().expect("in-memory bus built").schema_transport()),
        TransportKind::Redis => Arc::clone(&redis.as_ref().expect("redis transports connected").schema),
    };

    Ok(TransportHandles { rpc, result, event, schema })
}
