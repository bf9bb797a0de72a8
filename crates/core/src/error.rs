//! The bus error taxonomy.
//!
//! Layer crates (`lightbus-transport`, `lightbus-schema`, `lightbus-worker`, …)
//! define their own focused `thiserror` enums and convert into `BusError` at
//! the façade boundary, folding each layer's local error type into one
//! caller-facing taxonomy.

use thiserror::Error;

/// Result type used across the bus.
pub type BusResult<T> = Result<T, BusError>;

/// The kind of failure carried by a `RemoteError` (handler-raised errors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// The handler itself raised/returned an error.
    HandlerError,
    /// Incoming kwargs failed schema validation on the responder side.
    ValidationFailed,
    /// The invocation was cancelled (shutdown or timeout) before completion.
    Cancelled,
    /// An infrastructure failure inside the dispatcher, not attributable to
    /// the handler's business logic.
    Internal,
}

impl core::fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::HandlerError => "handler_error",
            Self::ValidationFailed => "validation_failed",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Unified error taxonomy for the bus client.
#[derive(Debug, Error, Clone)]
pub enum BusError {
    /// Invalid or missing configuration; fatal at `start()`.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Broker unreachable or protocol error.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// `call` deadline exceeded before a result arrived.
    #[error("rpc timed out after {timeout_secs}s")]
    RpcTimeout { timeout_secs: f64 },

    /// `call` expired with zero deliveries and the broker reports no
    /// consumers for the target API.
    #[error("no responders available for {api_name}")]
    NoResponders { api_name: String },

    /// Schema mismatch; `direction` is `"incoming"` or `"outgoing"`.
    #[error("validation failed ({direction}): {message}")]
    ValidationFailed { direction: &'static str, message: String },

    /// The address names an API this process has never heard of.
    #[error("no such api: {0}")]
    NoSuchApi(String),

    /// The address names a member not registered on that API.
    #[error("no such member: {api_name}.{member_name}")]
    NoSuchMember { api_name: String, member_name: String },

    /// The handler raised; `kind` distinguishes local bookkeeping.
    #[error("remote error ({kind}): {message}")]
    RemoteError { kind: RemoteErrorKind, message: String },

    /// `listen()` was called twice for an overlapping address under the same
    /// `listener_name` in this client.
    #[error("listener {listener_name:?} already registered for {address}")]
    DuplicateListener { listener_name: String, address: String },

    /// Re-registering an API narrowed or removed something incompatibly.
    #[error("schema conflict for {api_name}: {message}")]
    SchemaConflict { api_name: String, message: String },

    /// Invalid lifecycle transition (e.g. `call()` after `stop()`).
    #[error("lifecycle error: {0}")]
    LifecycleError(String),

    /// Cancelled by shutdown or an explicit timeout, distinct from a normal
    /// `RpcTimeout` (used for event handlers and background tasks).
    #[error("operation cancelled: {0}")]
    Cancelled(String),
}

impl BusError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transport_failure(msg: impl Into<String>) -> Self {
        Self::TransportFailure(msg.into())
    }

    pub fn validation_failed(direction: &'static str, msg: impl Into<String>) -> Self {
        Self::ValidationFailed { direction, message: msg.into() }
    }

    pub fn no_such_api(api_name: impl Into<String>) -> Self {
        Self::NoSuchApi(api_name.into())
    }

    pub fn no_such_member(api_name: impl Into<String>, member_name: impl Into<String>) -> Self {
        Self::NoSuchMember { api_name: api_name.into(), member_name: member_name.into() }
    }

    pub fn remote(kind: RemoteErrorKind, msg: impl Into<String>) -> Self {
        Self::RemoteError { kind, message: msg.into() }
    }

    /// `true` for errors that are safe to retry against a fresh connection.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportFailure(_))
    }
}
