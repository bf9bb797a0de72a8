use std::collections::HashSet;
use std::sync::RwLock;

use lightbus_core::{ApiName, MemberName};

use crate::error::RegistryError;

/// Tracks `(listener_name, api_name, event_name)` registrations for one
/// client so `listen()` can reject an overlapping re-registration.
#[derive(Default)]
pub struct ListenerRegistry {
    registered: RwLock<HashSet<(String, String, String)>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener_name` against every `(api_name, event_name)` pair.
    /// Fails atomically (no partial registration) if any pair already has
    /// this `listener_name` registered.
    pub fn register(
        &self,
        listener_name: &str,
        addresses: &[(ApiName, MemberName)],
    ) -> Result<(), RegistryError> {
        let mut registered = self.registered.write().expect("listener registry lock poisoned");
        for (api, event) in addresses {
            let key = (listener_name.to_string(), api.as_str().to_string(), event.as_str().to_string());
            if registered.contains(&key) {
                return Err(RegistryError::DuplicateListener {
                    listener_name: listener_name.to_string(),
                    address: format!("{api}.{event}"),
                });
            }
        }
        for (api, event) in addresses {
            registered.insert((listener_name.to_string(), api.as_str().to_string(), event.as_str().to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_listener_for_the_same_address_is_rejected() {
        let registry = ListenerRegistry::new();
        let addr = vec![(ApiName::new("store"), MemberName::new("page_view"))];
        registry.register("audit", &addr).unwrap();
        assert!(registry.register("audit", &addr).is_err());
    }

    #[test]
    fn distinct_listener_names_may_share_an_address() {
        let registry = ListenerRegistry::new();
        let addr = vec![(ApiName::new("store"), MemberName::new("page_view"))];
        registry.register("audit", &addr).unwrap();
        assert!(registry.register("cache", &addr).is_ok());
    }
}
