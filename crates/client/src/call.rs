use std::str::FromStr;

use lightbus_core::{BusError, CanonicalAddress};
use lightbus_message::{EventMessage, Kwargs, Metadata, ReturnPath, RpcMessage, CODEC_KEY};
use lightbus_registry::{HookContext, HookPoint};
use lightbus_transport::EventSendOptions;

use crate::state::ClientState;
use crate::Client;

impl Client {
    /// Invoke a remote procedure and await its result.
    pub async fn call(&self, address: &str, kwargs: Kwargs) -> Result<serde_json::Value, BusError> {
        self.require_running()?;
        let addr = CanonicalAddress::from_str(address)?;
        let options = self.config.api_options(addr.api_name().as_str());

        if options.validate.validates_outgoing() {
            if let Some(schema) = self.method_schema(addr.api_name().as_str(), addr.member_name().as_str()).await? {
                lightbus_schema::validate_against(&schema, &kwargs.clone().into_value(), "outgoing")?;
            }
        }

        let return_path = ReturnPath::new(lightbus_core::MessageId::new().to_string());
        let metadata = Metadata::new().with(CODEC_KEY, "json");
        let message = RpcMessage::new(addr.api_name().clone(), addr.member_name().clone(), kwargs, return_path.clone(), metadata);

        self.rpc_transport.publish(message.clone()).await?;

        let result = self
            .result_transport
            .receive_result(&message, &return_path, options.rpc_timeout())
            .await
            .map_err(|err| match err {
                lightbus_transport::TransportError::Timeout => {
                    BusError::RpcTimeout { timeout_secs: options.rpc_timeout_secs }
                }
                other => other.into(),
            })?;

        match result.outcome() {
            lightbus_message::ResultOutcome::Success(value) => Ok(value.clone()),
            lightbus_message::ResultOutcome::Error { kind, message } => {
                Err(BusError::remote(*kind, message.clone()))
            }
        }
    }

    /// Fire an event without waiting for listeners.
    pub async fn fire(&self, address: &str, kwargs: Kwargs) -> Result<(), BusError> {
        self.require_running()?;
        let addr = CanonicalAddress::from_str(address)?;
        let options = self.config.api_options(addr.api_name().as_str());

        if options.validate.validates_outgoing() {
            if let Some(schema) = self.event_schema(addr.api_name().as_str(), addr.member_name().as_str()).await? {
                lightbus_schema::validate_against(&schema, &kwargs.clone().into_value(), "outgoing")?;
            }
        }

        let ctx = HookContext::for_member(addr.api_name().clone(), addr.member_name().as_str());
        self.hooks
            .run_before(HookPoint::BeforeFireEvent, &ctx)
            .await
            .map_err(BusError::Cancelled)?;

        let message = EventMessage::new(addr.api_name().clone(), addr.member_name().clone(), kwargs, Metadata::new().with(CODEC_KEY, "json"));

        let fire_result = tokio::time::timeout(
            options.event_fire_timeout(),
            self.event_transport.send_event(message, EventSendOptions::default()),
        )
        .await
        .map_err(|_| BusError::RpcTimeout { timeout_secs: options.event_fire_timeout_secs })?;

        fire_result?;
        self.hooks.run_after(HookPoint::AfterFireEvent, &ctx).await;
        Ok(())
    }

    /// Reject `call`/`fire` issued before `start()` or during/after `stop()`
    /// instead of racing the transports mid-open or mid-close.
    fn require_running(&self) -> Result<(), BusError> {
        let state = self.state();
        if state == ClientState::Running {
            Ok(())
        } else {
            Err(BusError::LifecycleError(format!("client is not running (state: {state:?})")))
        }
    }

    async fn method_schema(&self, api_name: &str, member_name: &str) -> Result<Option<lightbus_schema::ParameterSchema>, BusError> {
        if let Ok(Some(schema)) = self.registry.with_api(api_name, |api| api.method(member_name).map(|m| m.parameters.clone())) {
            return Ok(Some(schema));
        }
        let remote = self.schema_transport.load(&lightbus_core::ApiName::new(api_name)).await?;
        Ok(remote.and_then(|s| s.method(member_name).map(|m| m.parameters.clone())))
    }

    async fn event_schema(&self, api_name: &str, member_name: &str) -> Result<Option<lightbus_schema::ParameterSchema>, BusError> {
        if let Ok(Some(schema)) = self.registry.with_api(api_name, |api| api.event(member_name).map(|e| e.parameters.clone())) {
            return Ok(Some(schema));
        }
        let remote = self.schema_transport.load(&lightbus_core::ApiName::new(api_name)).await?;
        Ok(remote.and_then(|s| s.event(member_name).map(|e| e.parameters.clone())))
    }
}
