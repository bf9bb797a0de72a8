//! Wire-level message envelopes: `RpcMessage`, `ResultMessage`, `EventMessage`.
//!
//! This crate owns the shapes that cross a transport boundary. It knows
//! nothing about how those shapes are carried — that's `lightbus-codec`
//! and `lightbus-transport`'s job.

mod event;
mod kwargs;
mod metadata;
mod result;
mod rpc;

pub use event::EventMessage;
pub use kwargs::Kwargs;
pub use metadata::{Metadata, CLIENT_ID_KEY, CODEC_KEY, TRACE_PARENT_KEY};
pub use result::{ResultMessage, ResultOutcome};
pub use rpc::{ReturnPath, RpcMessage};
