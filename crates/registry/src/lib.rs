//! In-process API registry and hook bus.
//!
//! `ApiRegistry` owns named APIs, their methods/events, and the handlers
//! that implement them; it is read-mostly after `start()`. `ListenerRegistry`
//! guards against an overlapping `listen()` re-registration in the same
//! client. `HookBus` runs the fixed before/after hook points in order.

mod api;
mod error;
mod handler;
mod hooks;
mod listener;
mod registry;

pub use api::{ApiDefinition, EventDefinition, MethodDefinition};
pub use error::RegistryError;
pub use handler::{EventHandler, RpcHandler};
pub use hooks::{Hook, HookBus, HookContext, HookPoint};
pub use listener::ListenerRegistry;
pub use registry::ApiRegistry;
