use async_trait::async_trait;
use serde_json::Value;

use lightbus_message::Kwargs;

/// User-authored procedure implementation for one registered method.
///
/// Handler errors are captured by the dispatcher and marshalled into a
/// `RemoteError`; this trait stays infallible-looking
/// from the registry's point of view by returning a plain message string.
#[async_trait]
pub trait RpcHandler: Send + Sync {
    async fn call(&self, kwargs: &Kwargs) -> Result<Value, String>;
}

/// Blanket impl so a plain async closure can be registered directly, the
/// same ergonomics the dispatcher wants for tests and small examples.
#[async_trait]
impl<F, Fut> RpcHandler for F
where
    F: Fn(&Kwargs) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<Value, String>> + Send,
{
    async fn call(&self, kwargs: &Kwargs) -> Result<Value, String> {
        self(kwargs).await
    }
}

/// User-authored event listener implementation.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn call(&self, kwargs: &Kwargs) -> Result<(), String>;
}

#[async_trait]
impl<F, Fut> EventHandler for F
where
    F: Fn(&Kwargs) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<(), String>> + Send,
{
    async fn call(&self, kwargs: &Kwargs) -> Result<(), String> {
        self(kwargs).await
    }
}
