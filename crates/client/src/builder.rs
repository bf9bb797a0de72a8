use std::sync::Arc;

use tokio::sync::watch;

use lightbus_core::ClientConfig;
use lightbus_registry::{ApiRegistry, HookBus, ListenerRegistry};
use lightbus_transport::{EventTransport, ResultTransport, RpcTransport, SchemaTransport};
use lightbus_worker::EventHandlerRegistry;

use crate::state::StateCell;
use crate::Client;

/// Assembles a [`Client`] from a config and the four transport handles.
/// Transport construction (in-memory vs Redis) is the caller's concern —
/// `lightbus-cli` picks concrete transports from `ClientConfig::bus` and
/// hands them here.
pub struct ClientBuilder {
    config: Arc<ClientConfig>,
    rpc_transport: Arc<dyn RpcTransport>,
    result_transport: Arc<dyn ResultTransport>,
    event_transport: Arc<dyn EventTransport>,
    schema_transport: Arc<dyn SchemaTransport>,
}

impl ClientBuilder {
    pub fn new(
        config: ClientConfig,
        rpc_transport: Arc<dyn RpcTransport>,
        result_transport: Arc<dyn ResultTransport>,
        event_transport: Arc<dyn EventTransport>,
        schema_transport: Arc<dyn SchemaTransport>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            rpc_transport,
            result_transport,
            event_transport,
            schema_transport,
        }
    }

    pub fn build(self) -> Client {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Client {
            config: self.config,
            registry: Arc::new(ApiRegistry::new()),
            listener_registry: Arc::new(ListenerRegistry::new()),
            hooks: Arc::new(HookBus::new()),
            event_handlers: Arc::new(EventHandlerRegistry::new()),
            rpc_transport: self.rpc_transport,
            result_transport: self.result_transport,
            event_transport: self.event_transport,
            schema_transport: self.schema_transport,
            state: StateCell::new(),
            shutdown_tx,
            shutdown_rx,
            served_apis: std::sync::Mutex::new(Vec::new()),
            listeners: std::sync::Mutex::new(Vec::new()),
            tasks: tokio::sync::Mutex::new(tokio::task::JoinSet::new()),
        }
    }
}
