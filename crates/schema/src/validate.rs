use lightbus_core::BusError;

use crate::ParameterSchema;

/// Validates `instance` against `schema`, returning `BusError::ValidationFailed`
/// with `direction` set to `"incoming"` or `"outgoing"`.
///
/// The validator is compiled fresh per call. Schemas are small (method/event
/// parameter shapes) and validated far less often than messages are
/// constructed, so this is not worth caching against the complexity of
/// invalidating a cache on schema refresh.
pub fn validate_against(
    schema: &ParameterSchema,
    instance: &serde_json::Value,
    direction: &'static str,
) -> Result<(), BusError> {
    let validator = jsonschema::validator_for(schema.as_value())
        .map_err(|e| BusError::validation_failed(direction, format!("invalid schema: {e}")))?;

    if let Some(first) = validator.iter_errors(instance).next() {
        return Err(BusError::validation_failed(direction, first.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> ParameterSchema {
        ParameterSchema::new(json!({
            "type": "object",
            "properties": { "user": { "type": "string" } },
            "required": ["user"]
        }))
    }

    #[test]
    fn accepts_a_matching_instance() {
        let result = validate_against(&schema(), &json!({ "user": "alice" }), "incoming");
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_a_missing_required_field() {
        let result = validate_against(&schema(), &json!({}), "incoming");
        assert!(matches!(result, Err(BusError::ValidationFailed { direction: "incoming", .. })));
    }

    #[test]
    fn rejects_a_type_mismatch() {
        let result = validate_against(&schema(), &json!({ "user": 5 }), "outgoing");
        assert!(matches!(result, Err(BusError::ValidationFailed { direction: "outgoing", .. })));
    }
}
