//! Configuration surface.
//!
//! File parsing and environment-variable overlays are the CLI's job; this
//! module only models the shape, with the same defaults the original
//! Lightbus documents.

use std::collections::HashMap;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which transport backend a client should open for a given concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Single-process, test/dev only; never crosses a process boundary.
    InMemory,
    /// Redis-backed, production transport.
    Redis,
}

impl Default for TransportKind {
    fn default() -> Self {
        Self::InMemory
    }
}

/// `bus.schema_transport` / `bus.rpc_transport` / `bus.result_transport` /
/// `bus.event_transport`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BusTransportConfig {
    #[serde(default)]
    pub schema_transport: TransportKind,
    #[serde(default)]
    pub rpc_transport: TransportKind,
    #[serde(default)]
    pub result_transport: TransportKind,
    #[serde(default)]
    pub event_transport: TransportKind,
    /// Connection string for transports that need one (ignored by `InMemory`).
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

impl Default for BusTransportConfig {
    fn default() -> Self {
        Self {
            schema_transport: TransportKind::default(),
            rpc_transport: TransportKind::default(),
            result_transport: TransportKind::default(),
            event_transport: TransportKind::default(),
            redis_url: default_redis_url(),
        }
    }
}

/// Schema enforcement scope (`validate` option).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationScope {
    Off,
    Incoming,
    Outgoing,
    Both,
}

impl ValidationScope {
    pub fn validates_incoming(self) -> bool {
        matches!(self, Self::Incoming | Self::Both)
    }

    pub fn validates_outgoing(self) -> bool {
        matches!(self, Self::Outgoing | Self::Both)
    }
}

impl Default for ValidationScope {
    fn default() -> Self {
        Self::Both
    }
}

/// `on_error` policy for listener handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OnErrorPolicy {
    /// Terminate the consumer loop and log.
    Raise,
    /// Acknowledge and continue.
    Swallow,
    /// Do not acknowledge; let the broker redeliver after lease expiry.
    Requeue,
}

impl Default for OnErrorPolicy {
    fn default() -> Self {
        Self::Requeue
    }
}

/// `since` stream position for listener replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReplaySince {
    /// Only events fired after the listener starts.
    New,
    /// Broker-specific "latest known position" marker.
    Tail,
    /// An explicit, transport-specific stream position.
    Explicit(String),
}

impl Default for ReplaySince {
    fn default() -> Self {
        Self::New
    }
}

/// `apis.<name>.*` per-API options.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApiOptions {
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: f64,
    #[serde(default = "default_event_fire_timeout_secs")]
    pub event_fire_timeout_secs: f64,
    #[serde(default)]
    pub validate: ValidationScope,
    #[serde(default)]
    pub cast_values: bool,
}

fn default_rpc_timeout_secs() -> f64 {
    5.0
}

fn default_event_fire_timeout_secs() -> f64 {
    5.0
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            rpc_timeout_secs: default_rpc_timeout_secs(),
            event_fire_timeout_secs: default_event_fire_timeout_secs(),
            validate: ValidationScope::default(),
            cast_values: false,
        }
    }
}

impl ApiOptions {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.rpc_timeout_secs.max(0.0))
    }

    pub fn event_fire_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.event_fire_timeout_secs.max(0.0))
    }
}

/// Worker/dispatcher tuning.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkerConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_acknowledgement_timeout_secs")]
    pub acknowledgement_timeout_secs: f64,
    #[serde(default = "default_reclaim_interval_secs")]
    pub reclaim_interval_secs: f64,
    #[serde(default = "default_max_redeliveries")]
    pub max_redeliveries: u32,
    #[serde(default = "default_graceful_shutdown_timeout_secs")]
    pub graceful_shutdown_timeout_secs: f64,
    #[serde(default = "default_schema_ttl_secs")]
    pub schema_ttl_secs: u64,
}

fn default_concurrency() -> usize {
    10
}

fn default_acknowledgement_timeout_secs() -> f64 {
    60.0
}

fn default_reclaim_interval_secs() -> f64 {
    // reclaim_interval default = lease / 3.
    default_acknowledgement_timeout_secs() / 3.0
}

fn default_max_redeliveries() -> u32 {
    5
}

fn default_graceful_shutdown_timeout_secs() -> f64 {
    30.0
}

fn default_schema_ttl_secs() -> u64 {
    300
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            acknowledgement_timeout_secs: default_acknowledgement_timeout_secs(),
            reclaim_interval_secs: default_reclaim_interval_secs(),
            max_redeliveries: default_max_redeliveries(),
            graceful_shutdown_timeout_secs: default_graceful_shutdown_timeout_secs(),
            schema_ttl_secs: default_schema_ttl_secs(),
        }
    }
}

impl WorkerConfig {
    pub fn acknowledgement_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.acknowledgement_timeout_secs.max(0.0))
    }

    pub fn reclaim_interval(&self) -> Duration {
        Duration::from_secs_f64(self.reclaim_interval_secs.max(0.0))
    }

    pub fn graceful_shutdown_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.graceful_shutdown_timeout_secs.max(0.0))
    }

    pub fn schema_ttl(&self) -> Duration {
        Duration::from_secs(self.schema_ttl_secs)
    }
}

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ClientConfig {
    #[serde(default)]
    pub bus: BusTransportConfig,
    #[serde(default)]
    pub apis: HashMap<String, ApiOptions>,
    #[serde(default)]
    pub worker: WorkerConfig,
}

impl ClientConfig {
    /// Options for a named API, falling back to documented defaults when the
    /// API has no explicit entry.
    pub fn api_options(&self, api_name: &str) -> ApiOptions {
        self.apis.get(api_name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reclaim_interval_defaults_to_lease_over_three() {
        let cfg = WorkerConfig::default();
        assert!((cfg.reclaim_interval_secs - cfg.acknowledgement_timeout_secs / 3.0).abs() < 1e-9);
    }

    #[test]
    fn unregistered_api_gets_defaults() {
        let cfg = ClientConfig::default();
        let opts = cfg.api_options("unknown.api");
        assert_eq!(opts.validate, ValidationScope::Both);
    }
}
