use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode envelope: {0}")]
    Encode(String),
    #[error("failed to decode envelope: {0}")]
    Decode(String),
    #[error("invalid base64 payload: {0}")]
    InvalidBinary(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        // serde_json doesn't distinguish encode vs. decode failures by type,
        // but in practice this conversion only ever runs on the decode path
        // here (encode failures on these envelope types are not reachable:
        // no non-finite floats, no non-string map keys).
        Self::Decode(err.to_string())
    }
}
