use lightbus_core::BusError;

use crate::{ApiSchema, ParameterSchema};

/// Additive-only compatibility rule for re-registration: new
/// optional parameters are fine; removing a method/event/parameter, or
/// narrowing a parameter's type, or making a previously-optional parameter
/// required, is a `SchemaConflict`.
pub fn check_compatible(old: &ApiSchema, new: &ApiSchema) -> Result<(), BusError> {
    for (name, old_method) in old.methods() {
        let new_method = new.method(name).ok_or_else(|| conflict(old, format!("method {name:?} removed")))?;
        check_parameters(old, name, &old_method.parameters, &new_method.parameters)?;
        check_parameters(
            old,
            &format!("{name} (response)"),
            &old_method.response,
            &new_method.response,
        )?;
    }

    for (name, old_event) in old.events() {
        let new_event = new.event(name).ok_or_else(|| conflict(old, format!("event {name:?} removed")))?;
        check_parameters(old, name, &old_event.parameters, &new_event.parameters)?;
    }

    Ok(())
}

fn check_parameters(
    old: &ApiSchema,
    member: &str,
    old_params: &ParameterSchema,
    new_params: &ParameterSchema,
) -> Result<(), BusError> {
    for name in old_params.property_names() {
        let old_type = old_params.property_type(name);
        let Some(new_type) = new_params.property_type(name) else {
            return Err(conflict(old, format!("{member}: parameter {name:?} removed")));
        };
        if old_type != Some(new_type) {
            return Err(conflict(
                old,
                format!("{member}: parameter {name:?} narrowed from {old_type:?} to {new_type:?}"),
            ));
        }
        if !old_params.is_required(name) && new_params.is_required(name) {
            return Err(conflict(
                old,
                format!("{member}: parameter {name:?} became required"),
            ));
        }
    }

    for name in new_params.property_names() {
        if new_params.is_required(name) && !old_params.property_names().contains(&name) {
            return Err(conflict(
                old,
                format!("{member}: new required parameter {name:?}"),
            ));
        }
    }

    Ok(())
}

fn conflict(schema: &ApiSchema, message: String) -> BusError {
    BusError::SchemaConflict {
        api_name: schema.api_name().to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventSignature, MethodSignature};
    use lightbus_core::ApiName;
    use serde_json::json;

    fn params(properties: serde_json::Value, required: &[&str]) -> ParameterSchema {
        ParameterSchema::new(json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }))
    }

    fn schema_with_login(user_required: bool, extra_optional: bool) -> ApiSchema {
        let mut properties = json!({ "user": { "type": "string" } });
        let mut required = vec![];
        if user_required {
            required.push("user");
        }
        if extra_optional {
            properties
                .as_object_mut()
                .unwrap()
                .insert("remember_me".to_string(), json!({ "type": "boolean" }));
        }
        ApiSchema::new(ApiName::new("auth")).with_method(
            "login",
            MethodSignature {
                parameters: params(properties, &required),
                response: ParameterSchema::any_object(),
            },
        )
    }

    #[test]
    fn adding_an_optional_parameter_is_compatible() {
        let old = schema_with_login(true, false);
        let new = schema_with_login(true, true);
        assert!(check_compatible(&old, &new).is_ok());
    }

    #[test]
    fn removing_a_method_conflicts() {
        let old = schema_with_login(true, false);
        let new = ApiSchema::new(ApiName::new("auth"));
        assert!(check_compatible(&old, &new).is_err());
    }

    #[test]
    fn narrowing_a_parameter_type_conflicts() {
        let old = schema_with_login(true, false);
        let new = ApiSchema::new(ApiName::new("auth")).with_method(
            "login",
            MethodSignature {
                parameters: params(json!({ "user": { "type": "integer" } }), &["user"]),
                response: ParameterSchema::any_object(),
            },
        );
        assert!(check_compatible(&old, &new).is_err());
    }

    #[test]
    fn adding_a_new_required_parameter_conflicts() {
        let old = schema_with_login(true, false);
        let new = ApiSchema::new(ApiName::new("auth")).with_method(
            "login",
            MethodSignature {
                parameters: params(
                    json!({ "user": { "type": "string" }, "tenant": { "type": "string" } }),
                    &["user", "tenant"],
                ),
                response: ParameterSchema::any_object(),
            },
        );
        assert!(check_compatible(&old, &new).is_err());
    }

    #[test]
    fn events_follow_the_same_rule() {
        let old = ApiSchema::new(ApiName::new("store")).with_event(
            "page_view",
            EventSignature { parameters: params(json!({ "id": { "type": "integer" } }), &["id"]) },
        );
        let new = ApiSchema::new(ApiName::new("store"));
        assert!(check_compatible(&old, &new).is_err());
    }
}
