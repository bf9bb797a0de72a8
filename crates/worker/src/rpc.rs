use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, instrument, warn};

use lightbus_core::{ApiName, BusError, ClientConfig, RemoteErrorKind};
use lightbus_message::{Metadata, ResultMessage, RpcMessage};
use lightbus_registry::{ApiRegistry, HookContext, HookPoint};
use lightbus_transport::{Delivery, ResultTransport, RpcTransport};

use crate::concurrency::ConcurrencyGate;

/// Runs one RPC consumer loop: validate, invoke
/// hooks and handler, reply, then acknowledge — never the other way around,
/// so a crash between reply and acknowledge is at worst a duplicate
/// delivery, never a lost result.
pub struct RpcDispatcher {
    registry: Arc<ApiRegistry>,
    hooks: Arc<lightbus_registry::HookBus>,
    rpc_transport: Arc<dyn RpcTransport>,
    result_transport: Arc<dyn ResultTransport>,
    config: Arc<ClientConfig>,
}

impl RpcDispatcher {
    pub fn new(
        registry: Arc<ApiRegistry>,
        hooks: Arc<lightbus_registry::HookBus>,
        rpc_transport: Arc<dyn RpcTransport>,
        result_transport: Arc<dyn ResultTransport>,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self { registry, hooks, rpc_transport, result_transport, config }
    }

    /// Consume `api_names` until `shutdown` is signalled, draining in-flight
    /// handlers for up to `graceful_shutdown_timeout` before returning.
    pub async fn run(self: Arc<Self>, api_names: Vec<ApiName>, mut shutdown: watch::Receiver<bool>) -> Result<(), BusError> {
        let concurrency = self.config.worker.concurrency;
        let gate = ConcurrencyGate::new(concurrency);
        let mut consumer = self
            .rpc_transport
            .consume(&api_names, concurrency)
            .await
            .map_err(BusError::from)?;
        let mut in_flight: JoinSet<()> = JoinSet::new();

        loop {
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
                    in_flight.spawn(async move {
                        this.handle_one(delivery).await;
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
            warn!("graceful_shutdown_timeout elapsed with RPC handlers still in flight; abandoning");
            in_flight.shutdown().await;
        }

        Ok(())
    }

    #[instrument(skip(self, delivery), fields(rpc_id = %delivery.message.id()))]
    async fn handle_one(&self, delivery: Delivery<RpcMessage>) {
        let Delivery { message, lease } = delivery;
        let api_name = message.api_name().clone();
        let options = self.config.api_options(api_name.as_str());

        let ctx = HookContext::for_member(api_name.clone(), message.procedure_name().as_str());
        let result = self.dispatch(&message, &options).await;

        self.hooks.run_after(HookPoint::AfterInvocation, &ctx).await;

        let result_message = match result {
            Ok(value) => ResultMessage::success(message.id(), value, Metadata::new()),
            Err((kind, msg)) => {
                if kind == RemoteErrorKind::Internal {
                    self.hooks.run_after(HookPoint::Exception, &ctx.clone().with_error(msg.clone())).await;
                }
                ResultMessage::error(message.id(), kind, msg, Metadata::new())
            }
        };

        if let Err(err) = self
            .result_transport
            .send_result(&message, result_message, message.return_path())
            .await
        {
            error!(error = %err, "failed to send rpc result; leaving lease for redelivery");
            return;
        }

        if let Err(err) = lease.acknowledge().await {
            error!(error = %err, "failed to acknowledge rpc lease after a successful reply");
        }
    }

    async fn dispatch(
        &self,
        message: &RpcMessage,
        options: &lightbus_core::ApiOptions,
    ) -> Result<serde_json::Value, (RemoteErrorKind, String)> {
        let method = self
            .registry
            .with_api(message.api_name().as_str(), |api| {
                api.method(message.procedure_name().as_str()).map(|m| (m.parameters.clone(), Arc::clone(&m.handler)))
            })
            .map_err(|e| (RemoteErrorKind::Internal, lightbus_core::BusError::from(e).to_string()))?
            .ok_or_else(|| {
                (
                    RemoteErrorKind::Internal,
                    BusError::no_such_member(message.api_name().as_str(), message.procedure_name().as_str()).to_string(),
                )
            })?;
        let (parameters, handler) = method;

        if options.validate.validates_incoming() {
            if let Err(e) = lightbus_schema::validate_against(&parameters, &message.kwargs().clone().into_value(), "incoming") {
                return Err((RemoteErrorKind::ValidationFailed, e.to_string()));
            }
        }

        let ctx = HookContext::for_member(message.api_name().clone(), message.procedure_name().as_str());
        if let Err(e) = self.hooks.run_before(HookPoint::BeforeInvocation, &ctx).await {
            return Err((RemoteErrorKind::Cancelled, e));
        }

        debug!(api = %message.api_name(), procedure = %message.procedure_name(), "invoking handler");
        handler.call(message.kwargs()).await.map_err(|e| (RemoteErrorKind::HandlerError, e))
    }
}
