use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Free-form string metadata carried by every envelope: correlation
/// IDs, client identity, trace context, and the codec identifier
/// (`metadata.codec`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(HashMap<String, String>);

pub const CODEC_KEY: &str = "codec";
pub const TRACE_PARENT_KEY: &str = "trace_parent";
pub const CLIENT_ID_KEY: &str = "client_id";

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn codec(&self) -> Option<&str> {
        self.get(CODEC_KEY)
    }

    pub fn client_id(&self) -> Option<&str> {
        self.get(CLIENT_ID_KEY)
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.0
    }
}

impl From<HashMap<String, String>> for Metadata {
    fn from(value: HashMap<String, String>) -> Self {
        Self(value)
    }
}
