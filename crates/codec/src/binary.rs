use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::CodecError;

/// Wraps raw bytes as a base64 string `Value`; binary payloads are always
/// base64-wrapped before crossing the wire.
pub fn encode_binary(bytes: &[u8]) -> Value {
    Value::String(STANDARD.encode(bytes))
}

/// Unwraps a base64-encoded `Value` produced by [`encode_binary`].
pub fn decode_binary(value: &Value) -> Result<Vec<u8>, CodecError> {
    let s = value
        .as_str()
        .ok_or_else(|| CodecError::InvalidBinary("expected a base64 string".to_string()))?;
    STANDARD
        .decode(s)
        .map_err(|e| CodecError::InvalidBinary(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let data = vec![0u8, 1, 2, 255, 128, 7];
        let encoded = encode_binary(&data);
        let decoded = decode_binary(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(decode_binary(&Value::Bool(true)).is_err());
    }
}
