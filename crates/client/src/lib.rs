//! Client façade: `call`/`fire`/`listen`/`register_api` plus
//! the `start`/`stop` lifecycle that wires registered APIs and listeners to
//! live consumer loops over whichever transports the builder was
//! given.

mod builder;
mod call;
mod global;
mod health;
mod lifecycle;
mod listen;
mod state;

pub use builder::ClientBuilder;
pub use global::{global_client, set_global_client};
pub use state::ClientState;

use std::sync::{Arc, Mutex};

use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinSet;

use lightbus_core::{ApiName, ClientConfig};
use lightbus_registry::{ApiRegistry, HookBus, ListenerRegistry};
use lightbus_transport::{EventTransport, ListenerSpec, ResultTransport, RpcTransport, SchemaTransport};
use lightbus_worker::EventHandlerRegistry;

use state::StateCell;

/// The bus client. One instance per process holds every
/// registered API, every listener subscription, and the background tasks
/// that service them once `start()` has run.
pub struct Client {
    config: Arc<ClientConfig>,
    registry: Arc<ApiRegistry>,
    listener_registry: Arc<ListenerRegistry>,
    hooks: Arc<HookBus>,
    event_handlers: Arc<EventHandlerRegistry>,
    rpc_transport: Arc<dyn RpcTransport>,
    result_transport: Arc<dyn ResultTransport>,
    event_transport: Arc<dyn EventTransport>,
    schema_transport: Arc<dyn SchemaTransport>,
    state: StateCell,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    /// APIs registered with at least one method, served by the RPC
    /// dispatch loop once `start()` runs.
    served_apis: Mutex<Vec<ApiName>>,
    /// Listener subscriptions accumulated by `listen()` before `start()`.
    listeners: Mutex<Vec<ListenerSpec>>,
    tasks: AsyncMutex<JoinSet<()>>,
}

impl Client {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn hooks(&self) -> &Arc<HookBus> {
        &self.hooks
    }

    pub fn state(&self) -> ClientState {
        self.state.get()
    }
}
