use std::sync::Arc;

use tracing::{debug, info, warn};

use lightbus_core::BusError;
use lightbus_registry::{HookContext, HookPoint};
use lightbus_worker::{EventDispatcher, ReclaimTask, RpcDispatcher};

use crate::state::ClientState;
use crate::Client;

impl Client {
    /// Bring the client up: open transports,
    /// freeze the registry, publish schemas, then spawn one consumer loop
    /// per concern that has work registered against it.
    pub async fn start(self: &Arc<Self>) -> Result<(), BusError> {
        self.state.transition(ClientState::Created, ClientState::Starting)?;

        self.rpc_transport.open().await?;
        self.result_transport.open().await?;
        self.event_transport.open().await?;
        self.schema_transport.open().await?;

        self.registry.freeze();

        let served_apis = self.served_apis.lock().expect("served_apis lock poisoned").clone();
        let ttl = self.config.worker.schema_ttl();
        for api_name in &served_apis {
            let schema = self.registry.with_api(api_name.as_str(), |api| api.to_schema())?;
            self.schema_transport.store(api_name, &schema, ttl).await?;
        }

        self.hooks.run_before(HookPoint::BeforeServerStart, &HookContext::default()).await.map_err(BusError::Cancelled)?;

        let mut tasks = self.tasks.lock().await;

        if !served_apis.is_empty() {
            let dispatcher = Arc::new(RpcDispatcher::new(
                Arc::clone(&self.registry),
                Arc::clone(&self.hooks),
                Arc::clone(&self.rpc_transport),
                Arc::clone(&self.result_transport),
                Arc::clone(&self.config),
            ));
            let rx = self.shutdown_rx.clone();
            tasks.spawn(async move {
                if let Err(err) = dispatcher.run(served_apis, rx).await {
                    warn!(error = %err, "rpc dispatcher exited with an error");
                }
            });
        }

        let listeners = self.listeners.lock().expect("listeners lock poisoned").clone();
        if !listeners.is_empty() {
            let dispatcher = Arc::new(EventDispatcher::new(
                Arc::clone(&self.registry),
                Arc::clone(&self.hooks),
                Arc::clone(&self.event_handlers),
                Arc::clone(&self.event_transport),
                Arc::clone(&self.schema_transport),
                Arc::clone(&self.config),
            ));
            let listener_names: Vec<String> = listeners.iter().map(|l| l.listener_name.clone()).collect();
            let rx = self.shutdown_rx.clone();
            tasks.spawn(async move {
                if let Err(err) = dispatcher.run(listeners, rx).await {
                    warn!(error = %err, "event dispatcher exited with an error");
                }
            });

            for listener_name in listener_names {
                let reclaim = Arc::new(ReclaimTask::new(Arc::clone(&self.event_transport), Arc::clone(&self.config)));
                let rx = self.shutdown_rx.clone();
                tasks.spawn(async move {
                    if let Err(err) = reclaim.run(listener_name, rx).await {
                        warn!(error = %err, "reclaim task exited with an error");
                    }
                });
            }
        }

        if !self.served_apis.lock().expect("served_apis lock poisoned").is_empty() {
            let schema_transport = Arc::clone(&self.schema_transport);
            let registry = Arc::clone(&self.registry);
            let api_names = self.served_apis.lock().expect("served_apis lock poisoned").clone();
            let mut rx = self.shutdown_rx.clone();
            let half_ttl = ttl / 2;
            tasks.spawn(async move {
                let mut ticker = tokio::time::interval(half_ttl);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        biased;
                        _ = rx.changed() => {
                            if *rx.borrow() { break; }
                        }
                        _ = ticker.tick() => {
                            for api_name in &api_names {
                                if registry.with_api(api_name.as_str(), |_| ()).is_err() {
                                    continue;
                                }
                                if let Err(err) = schema_transport.ping(api_name, ttl).await {
                                    warn!(api = %api_name.as_str(), error = %err, "schema ttl refresh failed");
                                }
                            }
                        }
                    }
                }
            });
        }

        drop(tasks);

        self.state.transition(ClientState::Starting, ClientState::Running)?;
        info!("client started");
        Ok(())
    }

    /// Signal shutdown, drain every background task, close transports, and
    /// run `AfterServerStopped` hooks.
    pub async fn stop(self: &Arc<Self>) -> Result<(), BusError> {
        self.state.transition(ClientState::Running, ClientState::Stopping)?;

        let _ = self.shutdown_tx.send(true);

        let mut tasks = self.tasks.lock().await;
        while tasks.join_next().await.is_some() {}
        drop(tasks);

        self.rpc_transport.close().await?;
        self.result_transport.close().await?;
        self.event_transport.close().await?;
        self.schema_transport.close().await?;

        self.hooks.run_after(HookPoint::AfterServerStopped, &HookContext::default()).await;

        self.state.transition(ClientState::Stopping, ClientState::Stopped)?;
        debug!("client stopped");
        Ok(())
    }
}
