use figment::providers::{Env, Serialized};
use figment::Figment;

use lightbus_core::{BusError, ClientConfig};

/// Loads a [`ClientConfig`] layering environment variables over the
/// documented defaults: `Serialized::defaults` seeds every field, then
/// `Env` overrides anything the caller sets. Nested fields are addressed
/// with `__`, e.g. `LIGHTBUS_BUS__REDIS_URL`, `LIGHTBUS_WORKER__CONCURRENCY`.
pub fn load() -> Result<ClientConfig, BusError> {
    Figment::new()
        .merge(Serialized::defaults(ClientConfig::default()))
        .merge(Env::prefixed("LIGHTBUS_").split("__"))
        .extract()
        .map_err(|err| BusError::configuration(err.to_string()))
}
