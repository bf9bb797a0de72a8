use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, instrument, warn};

use lightbus_core::{ApiName, BusError, ClientConfig, MemberName, OnErrorPolicy};
use lightbus_registry::{ApiRegistry, EventHandler, HookContext, HookPoint};
use lightbus_schema::ApiSchema;
use lightbus_transport::{Delivery, EventConsumer, EventTransport, Lease, ListenerSpec, SchemaTransport};

use crate::concurrency::ConcurrencyGate;

struct CachedSchema {
    schema: ApiSchema,
    fetched_at: Instant,
}

struct RegisteredListener {
    handler: Arc<dyn EventHandler>,
    on_error: OnErrorPolicy,
}

/// Maps `(listener_name, api_name, event_name)` to the handler and
/// `on_error` policy `listen()` registered it with.
#[derive(Default)]
pub struct EventHandlerRegistry {
    handlers: RwLock<HashMap<(String, String, String), RegisteredListener>>,
}

impl EventHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        listener_name: &str,
        api_name: &ApiName,
        event_name: &MemberName,
        handler: Arc<dyn EventHandler>,
        on_error: OnErrorPolicy,
    ) {
        self.handlers.write().expect("event handler registry poisoned").insert(
            (listener_name.to_string(), api_name.as_str().to_string(), event_name.as_str().to_string()),
            RegisteredListener { handler, on_error },
        );
    }

    fn get(&self, listener_name: &str, api_name: &str, event_name: &str) -> Option<(Arc<dyn EventHandler>, OnErrorPolicy)> {
        self.handlers
            .read()
            .expect("event handler registry poisoned")
            .get(&(listener_name.to_string(), api_name.to_string(), event_name.to_string()))
            .map(|r| (Arc::clone(&r.handler), r.on_error))
    }
}

/// Runs one consumer-group loop.
pub struct EventDispatcher {
    registry: Arc<ApiRegistry>,
    hooks: Arc<lightbus_registry::HookBus>,
    handlers: Arc<EventHandlerRegistry>,
    event_transport: Arc<dyn EventTransport>,
    schema_transport: Arc<dyn SchemaTransport>,
    config: Arc<ClientConfig>,
    /// Set by a handler under `on_error = raise`; checked once per iteration of [`Self::run`].
    raised: std::sync::atomic::AtomicBool,
    /// Schemas for APIs this process doesn't serve locally, fetched via
    /// `schema_transport` and kept for `schema_ttl` before refetching.
    schema_cache: RwLock<HashMap<String, CachedSchema>>,
}

impl EventDispatcher {
    pub fn new(
        registry: Arc<ApiRegistry>,
        hooks: Arc<lightbus_registry::HookBus>,
        handlers: Arc<EventHandlerRegistry>,
        event_transport: Arc<dyn EventTransport>,
        schema_transport: Arc<dyn SchemaTransport>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            registry,
            hooks,
            handlers,
            event_transport,
            schema_transport,
            config,
            raised: std::sync::atomic::AtomicBool::new(false),
            schema_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Schema for an event this process doesn't serve, pulled from
    /// `schema_transport` and cached for `schema_ttl` so steady-state
    /// validation doesn't hit the broker on every delivery.
    async fn remote_event_schema(&self, api_name: &str, event_name: &str) -> Option<lightbus_schema::ParameterSchema> {
        let ttl = self.config.worker.schema_ttl();
        let cached = {
            let cache = self.schema_cache.read().expect("schema cache poisoned");
            cache.get(api_name).and_then(|c| (c.fetched_at.elapsed() < ttl).then(|| c.schema.clone()))
        };
        let schema = match cached {
            Some(schema) => schema,
            None => {
                let loaded = self.schema_transport.load(&ApiName::new(api_name)).await.ok().flatten()?;
                self.schema_cache
                    .write()
                    .expect("schema cache poisoned")
                    .insert(api_name.to_string(), CachedSchema { schema: loaded.clone(), fetched_at: Instant::now() });
                loaded
            }
        };
        schema.event(event_name).map(|e| e.parameters.clone())
    }

    pub async fn run(self: Arc<Self>, listeners: Vec<ListenerSpec>, mut shutdown: watch::Receiver<bool>) -> Result<(), BusError> {
        let concurrency = self.config.worker.concurrency;
        let gate = ConcurrencyGate::new(concurrency);
        let mut consumer: EventConsumer = self.event_transport.consume(&listeners).await.map_err(BusError::from)?;
        let listener_names: Vec<String> = listeners.iter().map(|l| l.listener_name.clone()).collect();
        let mut in_flight: JoinSet<()> = JoinSet::new();

        loop {
            if self.raised.load(std::sync::atomic::Ordering::SeqCst) {
                warn!("terminating event consumer loop after on_error=raise");
                break;
            }
            tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
                delivery = consumer.recv() => {
                    let Some(delivery) = delivery else { break };
                    let permit = gate.acquire().await;
                    let this = Arc::clone(&self);
                    let names = listener_names.clone();
                    in_flight.spawn(async move {
                        this.handle_one(delivery, &names).await;
                        drop(permit);
                    });
                }
            }
        }

        let drain = self.config.worker.graceful_shutdown_timeout();
        if tokio::time::timeout(drain, async {
            while in_flight.join_next().await.is_some() {}
        })
        .await
        .is_err()
        {
            warn!("graceful_shutdown_timeout elapsed with event handlers still in flight; abandoning");
            in_flight.shutdown().await;
        }

        Ok(())
    }

    #[instrument(skip(self, delivery, listener_names), fields(event_id = %delivery.message.id()))]
    async fn handle_one(&self, delivery: Delivery<lightbus_message::EventMessage>, listener_names: &[String]) {
        let Delivery { message, lease } = delivery;
        let max_redeliveries = self.config.worker.max_redeliveries;
        if lease.delivery_count() > max_redeliveries {
            warn!(delivery_count = lease.delivery_count(), "exceeded max_redeliveries; dead-lettering");
            if let Err(err) = self.event_transport.dead_letter(&message, lease.delivery_count()).await {
                error!(error = %err, "failed to dead-letter event");
            }
            let _ = lease.acknowledge().await;
            return;
        }

        // This group's listener_name is whichever one of this loop's
        // registrations matches the member that fired; try each until one
        // has a handler registered for this exact address.
        let found = listener_names.iter().find_map(|name| {
            self.handlers.get(name, message.api_name().as_str(), message.event_name().as_str()).map(|h| (name.clone(), h))
        });

        let Some((listener_name, (handler, on_error))) = found else {
            warn!(api = %message.api_name(), event = %message.event_name(), "no handler registered for delivered event");
            let _ = lease.acknowledge().await;
            return;
        };

        let options = self.config.api_options(message.api_name().as_str());
        let ctx = HookContext::for_member(message.api_name().clone(), message.event_name().as_str());

        if options.validate.validates_incoming() {
            let local = self.registry.with_api(message.api_name().as_str(), |api| {
                api.event(message.event_name().as_str()).map(|e| e.parameters.clone())
            });
            let schema = match local {
                Ok(Some(schema)) => Some(schema),
                _ => self.remote_event_schema(message.api_name().as_str(), message.event_name().as_str()).await,
            };
            if let Some(schema) = schema {
                if let Err(e) = lightbus_schema::validate_against(&schema, &message.kwargs().clone().into_value(), "incoming") {
                    warn!(error = %e, listener = %listener_name, "event failed incoming validation");
                    self.apply_on_error(on_error, lease).await;
                    return;
                }
            }
        }

        if self.hooks.run_before(HookPoint::BeforeListenEvent, &ctx).await.is_err() {
            self.apply_on_error(on_error, lease).await;
            return;
        }

        debug!(listener = %listener_name, api = %message.api_name(), event = %message.event_name(), "invoking event handler");
        let outcome = handler.call(message.kwargs()).await;
        self.hooks.run_after(HookPoint::AfterListenEvent, &ctx).await;

        match outcome {
            Ok(()) => {
                if let Err(err) = lease.acknowledge().await {
                    error!(error = %err, "failed to acknowledge event lease after successful handling");
                }
            }
            Err(err) => {
                self.hooks.run_after(HookPoint::Exception, &ctx.with_error(err)).await;
                self.apply_on_error(on_error, lease).await;
            }
        }
    }

    async fn apply_on_error(&self, on_error: OnErrorPolicy, lease: Lease) {
        match on_error {
            OnErrorPolicy::Raise => {
                error!("event handler raised with on_error=raise; terminating this delivery without acknowledging");
                self.raised.store(true, std::sync::atomic::Ordering::SeqCst);
            }
            OnErrorPolicy::Swallow => {
                if let Err(err) = lease.acknowledge().await {
                    error!(error = %err, "failed to acknowledge event lease under swallow policy");
                }
            }
            OnErrorPolicy::Requeue => {
                // Do not acknowledge; the broker redelivers after the lease
                // expires.
                drop(lease);
            }
        }
    }
}
