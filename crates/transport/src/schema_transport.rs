use std::time::Duration;

use async_trait::async_trait;

use lightbus_core::ApiName;
use lightbus_schema::ApiSchema;

use crate::TransportError;

/// Schema pub/get.
#[async_trait]
pub trait SchemaTransport: Send + Sync {
    async fn open(&self) -> Result<(), TransportError>;
    async fn close(&self) -> Result<(), TransportError>;

    async fn store(&self, api_name: &ApiName, schema: &ApiSchema, ttl: Duration) -> Result<(), TransportError>;
    async fn load(&self, api_name: &ApiName) -> Result<Option<ApiSchema>, TransportError>;
    /// Refresh the TTL without rewriting the document.
    async fn ping(&self, api_name: &ApiName, ttl: Duration) -> Result<(), TransportError>;
}
