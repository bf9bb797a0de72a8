//! Consumer-loop dispatchers: RPC dispatch, event dispatch, and
//! the reclaim pass that reassigns stale pending entries back to a live
//! replica. Each dispatcher owns one `ApiRegistry`/`HookBus` pair and a
//! transport handle; `lightbus-client` wires the loops to real transports
//! and supervises their lifetime.

mod concurrency;
mod error;
mod event;
mod reclaim;
mod rpc;

pub use concurrency::ConcurrencyGate;
pub use error::DispatchError;
pub use event::{EventDispatcher, EventHandlerRegistry};
pub use reclaim::ReclaimTask;
pub use rpc::RpcDispatcher;
