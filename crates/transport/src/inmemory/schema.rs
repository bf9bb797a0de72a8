use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use lightbus_core::ApiName;
use lightbus_schema::ApiSchema;

use crate::{SchemaTransport, TransportError};

#[derive(Clone)]
pub(super) struct StoredSchema {
    schema: ApiSchema,
    expires_at: Instant,
}

/// In-memory realisation of [`SchemaTransport`]: a TTL'd map standing in for
/// the Redis hash + TTL realisation.
pub struct InMemorySchemaTransport {
    bus: Arc<super::InMemoryBus>,
}

impl InMemorySchemaTransport {
    pub(super) fn new(bus: Arc<super::InMemoryBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl SchemaTransport for InMemorySchemaTransport {
    async fn open(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn store(&self, api_name: &ApiName, schema: &ApiSchema, ttl: Duration) -> Result<(), TransportError> {
        self.bus.schemas.insert(
            api_name.as_str().to_string(),
            StoredSchema { schema: schema.clone(), expires_at: Instant::now() + ttl },
        );
        Ok(())
    }

    async fn load(&self, api_name: &ApiName) -> Result<Option<ApiSchema>, TransportError> {
        match self.bus.schemas.get(api_name.as_str()) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.schema.clone())),
            Some(_) => {
                self.bus.schemas.remove(api_name.as_str());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn ping(&self, api_name: &ApiName, ttl: Duration) -> Result<(), TransportError> {
        if let Some(mut entry) = self.bus.schemas.get_mut(api_name.as_str()) {
            entry.expires_at = Instant::now() + ttl;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn expired_schemas_are_treated_as_missing() {
        let bus = super::super::InMemoryBus::new();
        let transport = InMemorySchemaTransport::new(bus);
        let api = ApiName::new("auth");
        transport.store(&api, &ApiSchema::new(api.clone()), Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(transport.load(&api).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ping_extends_the_ttl() {
        let bus = super::super::InMemoryBus::new();
        let transport = InMemorySchemaTransport::new(bus);
        let api = ApiName::new("auth");
        transport.store(&api, &ApiSchema::new(api.clone()), Duration::from_millis(20)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        transport.ping(&api, Duration::from_secs(5)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(transport.load(&api).await.unwrap().is_some());
    }
}
