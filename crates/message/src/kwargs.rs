use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A string-keyed mapping of call/event parameters.
///
/// Order is preserved (backed by `serde_json::Map`, which is itself an
/// insertion-ordered map when the `preserve_order` feature is not in use it
/// falls back to `BTreeMap`; either way equality and schema validation are
/// unaffected).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kwargs(serde_json::Map<String, Value>);

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &serde_json::Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<serde_json::Map<String, Value>> for Kwargs {
    fn from(value: serde_json::Map<String, Value>) -> Self {
        Self(value)
    }
}

impl IntoIterator for Kwargs {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
