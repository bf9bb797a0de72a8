use std::collections::BTreeMap;
use std::sync::Arc;

use lightbus_core::ApiName;
use lightbus_schema::{ApiSchema, EventSignature, MethodSignature, ParameterSchema};

use crate::handler::RpcHandler;

/// One registered procedure: schema plus the handler that implements it.
pub struct MethodDefinition {
    pub parameters: ParameterSchema,
    pub response: ParameterSchema,
    pub handler: Arc<dyn RpcHandler>,
}

/// One registered event: schema plus the listeners subscribed in-process.
///
/// Events do not carry a handler at registration time — handlers are
/// attached per `listen()` call against a `listener_name`, not against the
/// API definition itself.
pub struct EventDefinition {
    pub parameters: ParameterSchema,
}

/// A named collection of methods and events forming one contract.
pub struct ApiDefinition {
    name: ApiName,
    methods: BTreeMap<String, MethodDefinition>,
    events: BTreeMap<String, EventDefinition>,
}

impl ApiDefinition {
    pub fn new(name: ApiName) -> Self {
        Self { name, methods: BTreeMap::new(), events: BTreeMap::new() }
    }

    pub fn with_method(
        mut self,
        name: impl Into<String>,
        parameters: ParameterSchema,
        response: ParameterSchema,
        handler: impl RpcHandler + 'static,
    ) -> Self {
        self.methods.insert(
            name.into(),
            MethodDefinition { parameters, response, handler: Arc::new(handler) },
        );
        self
    }

    pub fn with_event(mut self, name: impl Into<String>, parameters: ParameterSchema) -> Self {
        self.events.insert(name.into(), EventDefinition { parameters });
        self
    }

    pub fn name(&self) -> &ApiName {
        &self.name
    }

    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.get(name)
    }

    pub fn event(&self, name: &str) -> Option<&EventDefinition> {
        self.events.get(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = (&str, &MethodDefinition)> {
        self.methods.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn events(&self) -> impl Iterator<Item = (&str, &EventDefinition)> {
        self.events.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Derive the JSON-schema document published via `SchemaTransport`
    ///.
    pub fn to_schema(&self) -> ApiSchema {
        let mut schema = ApiSchema::new(self.name.clone());
        for (name, method) in &self.methods {
            schema = schema.with_method(
                name.clone(),
                MethodSignature { parameters: method.parameters.clone(), response: method.response.clone() },
            );
        }
        for (name, event) in &self.events {
            schema = schema.with_event(name.clone(), EventSignature { parameters: event.parameters.clone() });
        }
        schema
    }
}
