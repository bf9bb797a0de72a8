use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use lightbus_core::ApiName;

/// A raw JSON Schema document describing one parameter set or return shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSchema(Value);

impl ParameterSchema {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    /// An empty `{"type": "object"}` schema — accepts anything shaped as a
    /// JSON object, the default for a method with no declared parameters.
    pub fn any_object() -> Self {
        Self(serde_json::json!({ "type": "object" }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn properties(&self) -> Option<&serde_json::Map<String, Value>> {
        self.0.get("properties")?.as_object()
    }

    fn required(&self) -> Vec<&str> {
        self.0
            .get("required")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub(crate) fn property_type(&self, name: &str) -> Option<&Value> {
        self.properties()?.get(name)?.get("type")
    }

    pub(crate) fn property_names(&self) -> Vec<&str> {
        self.properties()
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub(crate) fn is_required(&self, name: &str) -> bool {
        self.required().contains(&name)
    }
}

/// One method's parameter and response schemas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSignature {
    pub parameters: ParameterSchema,
    pub response: ParameterSchema,
}

/// One event's parameter schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSignature {
    pub parameters: ParameterSchema,
}

/// The full schema document published for one API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSchema {
    api_name: ApiName,
    version: u64,
    methods: BTreeMap<String, MethodSignature>,
    events: BTreeMap<String, EventSignature>,
}

impl ApiSchema {
    pub fn new(api_name: ApiName) -> Self {
        Self {
            api_name,
            version: 1,
            methods: BTreeMap::new(),
            events: BTreeMap::new(),
        }
    }

    pub fn api_name(&self) -> &ApiName {
        &self.api_name
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn with_method(mut self, name: impl Into<String>, signature: MethodSignature) -> Self {
        self.methods.insert(name.into(), signature);
        self
    }

    pub fn with_event(mut self, name: impl Into<String>, signature: EventSignature) -> Self {
        self.events.insert(name.into(), signature);
        self
    }

    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.get(name)
    }

    pub fn event(&self, name: &str) -> Option<&EventSignature> {
        self.events.get(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = (&str, &MethodSignature)> {
        self.methods.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn events(&self) -> impl Iterator<Item = (&str, &EventSignature)> {
        self.events.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Bump the version, used when re-registration passes the compatibility
    /// check and the document is about to be republished.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }
}
