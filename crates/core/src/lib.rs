//! Shared identifiers, error taxonomy, and configuration surface for Lightbus.
//!
//! Every other crate in the workspace depends on this one; it carries no
//! transport, codec, or scheduling concerns of its own.

mod address;
mod config;
mod error;
mod id;

pub use address::{ApiName, CanonicalAddress, MemberName};
pub use config::{
    ApiOptions, BusTransportConfig, ClientConfig, OnErrorPolicy, ReplaySince, TransportKind,
    ValidationScope, WorkerConfig,
};
pub use error::{BusError, BusResult, RemoteErrorKind};
pub use id::MessageId;
