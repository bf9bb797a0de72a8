use thiserror::Error;

/// Transport-layer failures, folded into `lightbus_core::BusError` at the
/// client façade boundary.
#[derive(Debug, Error, Clone)]
pub enum TransportError {
    #[error("broker I/O failure: {0}")]
    Io(String),
    #[error("message exceeds transport size bounds: {0}")]
    InvalidMessage(String),
    #[error("deadline exceeded waiting for a result")]
    Timeout,
    #[error("operation not supported by this transport: {0}")]
    Unsupported(String),
    #[error("lease already acknowledged or expired")]
    LeaseExpired,
    #[error("no responders available for {0}")]
    NoResponders(String),
}

impl From<TransportError> for lightbus_core::BusError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => lightbus_core::BusError::RpcTimeout { timeout_secs: 0.0 },
            TransportError::NoResponders(api_name) => lightbus_core::BusError::NoResponders { api_name },
            other => lightbus_core::BusError::transport_failure(other.to_string()),
        }
    }
}
