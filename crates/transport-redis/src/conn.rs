use redis::aio::ConnectionManager;

use crate::error::RedisTransportError;

/// Shared connection handle. `ConnectionManager` reconnects transparently on
/// broker restarts, so every transport wrapper clones this rather than
/// opening its own socket.
#[derive(Clone)]
pub struct RedisConn {
    manager: ConnectionManager,
}

impl RedisConn {
    pub async fn connect(redis_url: &str) -> Result<Self, RedisTransportError> {
        let client = redis::Client::open(redis_url)?;
        let manager = client.get_connection_manager().await?;
        Ok(Self { manager })
    }

    pub fn handle(&self) -> ConnectionManager {
        self.manager.clone()
    }
}
