use lightbus_message::{EventMessage, ResultMessage, RpcMessage};

use crate::{Codec, CodecError};

/// Default codec: JSON over UTF-8. Binary `kwargs` values are not
/// handled here — callers wrap them with [`crate::encode_binary`] before
/// inserting into a `Kwargs` map, since `serde_json::Value` has no byte type.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn codec_id(&self) -> &'static str {
        "json"
    }

    fn encode_rpc(&self, message: &RpcMessage) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(message).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode_rpc(&self, bytes: &[u8]) -> Result<RpcMessage, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn encode_result(&self, message: &ResultMessage) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(message).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode_result(&self, bytes: &[u8]) -> Result<ResultMessage, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn encode_event(&self, message: &EventMessage) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(message).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode_event(&self, bytes: &[u8]) -> Result<EventMessage, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightbus_core::{ApiName, MemberName};
    use lightbus_message::{Kwargs, Metadata, ReturnPath};

    #[test]
    fn round_trips_an_rpc_message() {
        let codec = JsonCodec;
        let mut kwargs = Kwargs::new();
        kwargs.insert("user", "alice");
        let original = RpcMessage::new(
            ApiName::new("auth"),
            MemberName::new("login"),
            kwargs,
            ReturnPath::new("reply:abc"),
            Metadata::new().with("codec", "json"),
        );

        let bytes = codec.encode_rpc(&original).unwrap();
        let decoded = codec.decode_rpc(&bytes).unwrap();

        assert_eq!(decoded.id(), original.id());
        assert_eq!(decoded.api_name(), original.api_name());
        assert_eq!(decoded.procedure_name(), original.procedure_name());
    }
}
