use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use lightbus_core::ApiName;
use lightbus_schema::check_compatible;

use crate::api::ApiDefinition;
use crate::error::RegistryError;

/// In-process registry of named APIs: read-mostly after
/// `start()`, writes rejected from then on.
pub struct ApiRegistry {
    apis: RwLock<HashMap<String, ApiDefinition>>,
    frozen: AtomicBool,
}

impl Default for ApiRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiRegistry {
    pub fn new() -> Self {
        Self { apis: RwLock::new(HashMap::new()), frozen: AtomicBool::new(false) }
    }

    /// Mark the registry read-only. Called once by the lifecycle manager's
    /// `start()` sequence.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::SeqCst);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    /// Register (or additively re-register) an API. Re-registration must pass the additive-only
    /// compatibility check or be rejected with
    /// `SchemaConflict`; a first-time registration of a brand-new name is
    /// always accepted.
    pub fn register(&self, definition: ApiDefinition) -> Result<(), RegistryError> {
        let name = definition.name().as_str().to_string();
        if self.is_frozen() {
            return Err(RegistryError::Frozen(name));
        }

        let mut apis = self.apis.write().expect("registry lock poisoned");
        if let Some(existing) = apis.get(&name) {
            check_compatible(&existing.to_schema(), &definition.to_schema()).map_err(|e| match e {
                lightbus_core::BusError::SchemaConflict { api_name, message } => {
                    RegistryError::SchemaConflict { api_name, message }
                }
                other => RegistryError::SchemaConflict { api_name: name.clone(), message: other.to_string() },
            })?;
        }
        apis.insert(name, definition);
        Ok(())
    }

    pub fn contains(&self, api_name: &str) -> bool {
        self.apis.read().expect("registry lock poisoned").contains_key(api_name)
    }

    pub fn api_names(&self) -> Vec<ApiName> {
        self.apis
            .read()
            .expect("registry lock poisoned")
            .values()
            .map(|d| d.name().clone())
            .collect()
    }

    /// Run `f` against the named API's definition under the read lock.
    pub fn with_api<T>(&self, api_name: &str, f: impl FnOnce(&ApiDefinition) -> T) -> Result<T, RegistryError> {
        let apis = self.apis.read().expect("registry lock poisoned");
        let def = apis.get(api_name).ok_or_else(|| RegistryError::NoSuchApi(api_name.to_string()))?;
        Ok(f(def))
    }
}

#[cfg(test)]
mod tests {
    use lightbus_schema::ParameterSchema;

    use super::*;

    fn login_api() -> ApiDefinition {
        ApiDefinition::new(ApiName::new("auth")).with_method(
            "login",
            ParameterSchema::any_object(),
            ParameterSchema::any_object(),
            |_kwargs: &lightbus_message::Kwargs| async { Ok(serde_json::Value::Bool(true)) },
        )
    }

    #[test]
    fn registers_and_looks_up_an_api() {
        let registry = ApiRegistry::new();
        registry.register(login_api()).unwrap();
        assert!(registry.contains("auth"));
        assert!(!registry.contains("billing"));
    }

    #[test]
    fn writes_are_rejected_after_freeze() {
        let registry = ApiRegistry::new();
        registry.freeze();
        assert!(matches!(registry.register(login_api()), Err(RegistryError::Frozen(_))));
    }

    #[test]
    fn incompatible_reregistration_conflicts() {
        let registry = ApiRegistry::new();
        registry.register(login_api()).unwrap();
        let narrowed = ApiDefinition::new(ApiName::new("auth"));
        assert!(matches!(registry.register(narrowed), Err(RegistryError::SchemaConflict { .. })));
    }
}
