use lightbus_codec::CodecError;
use lightbus_transport::TransportError;

/// Wraps the `redis` crate's error type and this crate's codec use so a
/// single `?` chain reaches `TransportError` at the trait boundary.
#[derive(Debug, thiserror::Error)]
pub enum RedisTransportError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<RedisTransportError> for TransportError {
    fn from(err: RedisTransportError) -> Self {
        match err {
            RedisTransportError::Redis(e) => TransportError::Io(e.to_string()),
            RedisTransportError::Codec(e) => TransportError::InvalidMessage(e.to_string()),
        }
    }
}
