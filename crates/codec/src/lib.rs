//! Pluggable envelope codec.
//!
//! A codec converts the three envelope types to and from transport bytes.
//! The codec identifier travels in `metadata.codec` so a consumer can pick
//! the matching decoder without out-of-band agreement.

mod binary;
mod error;
mod json;

pub use binary::{decode_binary, encode_binary};
pub use error::CodecError;
pub use json::JsonCodec;

use lightbus_message::{EventMessage, ResultMessage, RpcMessage};

/// Converts envelopes to and from the bytes a transport carries.
///
/// Implementations must be stateless and safe to share across threads; the
/// dispatcher and client façade hold one instance for the lifetime of the
/// bus client.
pub trait Codec: Send + Sync {
    /// Identifier written to `metadata.codec` (e.g. `"json"`).
    fn codec_id(&self) -> &'static str;

    fn encode_rpc(&self, message: &RpcMessage) -> Result<Vec<u8>, CodecError>;
    fn decode_rpc(&self, bytes: &[u8]) -> Result<RpcMessage, CodecError>;

    fn encode_result(&self, message: &ResultMessage) -> Result<Vec<u8>, CodecError>;
    fn decode_result(&self, bytes: &[u8]) -> Result<ResultMessage, CodecError>;

    fn encode_event(&self, message: &EventMessage) -> Result<Vec<u8>, CodecError>;
    fn decode_event(&self, bytes: &[u8]) -> Result<EventMessage, CodecError>;
}
