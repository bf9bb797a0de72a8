use std::sync::Arc;

use lightbus_core::{ApiName, BusError, MemberName, OnErrorPolicy, ReplaySince};
use lightbus_registry::{ApiDefinition, EventHandler};
use lightbus_transport::ListenerSpec;

use crate::Client;

impl Client {
    /// Register an API definition. Additive
    /// re-registration of a name already on this client is allowed; anything
    /// narrower is rejected by the registry's compatibility check.
    pub fn register_api(&self, definition: ApiDefinition) -> Result<(), BusError> {
        let name = definition.name().clone();
        self.registry.register(definition)?;
        let mut served = self.served_apis.lock().expect("served_apis lock poisoned");
        if !served.contains(&name) {
            served.push(name);
        }
        Ok(())
    }

    /// Subscribe `listener_name` to `addresses`, starting from `since`.
    /// Rejects an address this `listener_name` is already registered
    /// against on this client.
    pub fn listen(
        &self,
        listener_name: impl Into<String>,
        addresses: Vec<(ApiName, MemberName)>,
        since: ReplaySince,
        on_error: OnErrorPolicy,
        handler: impl EventHandler + 'static,
    ) -> Result<(), BusError> {
        let listener_name = listener_name.into();
        self.listener_registry.register(&listener_name, &addresses)?;

        let handler: Arc<dyn EventHandler> = Arc::new(handler);
        for (api, event) in &addresses {
            self.event_handlers.insert(&listener_name, api, event, Arc::clone(&handler), on_error);
        }

        let mut spec = ListenerSpec::new(listener_name).with_since(since);
        for (api, event) in addresses {
            spec = spec.with_address(api, event);
        }
        self.listeners.lock().expect("listeners lock poisoned").push(spec);
        Ok(())
    }
}
