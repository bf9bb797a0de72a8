//! Transport interface: broker-agnostic traits for the four
//! concerns a bus client needs — RPC dispatch, RPC results, Event fan-out,
//! and schema pub/get. `lightbus-transport-redis` supplies the concrete
//! Redis realisation; [`inmemory`] supplies a single-process reference
//! implementation used by the worker/client test suites.

mod delivery;
mod error;
mod event_transport;
mod lease;
pub mod inmemory;
mod listener;
mod result_transport;
mod rpc_transport;
mod schema_transport;

pub use delivery::Delivery;
pub use error::TransportError;
pub use event_transport::{EventConsumer, EventSendOptions, EventTransport};
pub use lease::{Lease, LeaseAck};
pub use listener::ListenerSpec;
pub use result_transport::ResultTransport;
pub use rpc_transport::{RpcConsumer, RpcTransport};
pub use schema_transport::SchemaTransport;
