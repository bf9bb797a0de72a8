use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use lightbus_client::ClientBuilder;
use lightbus_core::ClientConfig;

use crate::commands::Interrupted;
use crate::transports;

/// `lightbus run` — start a bus client on the loaded configuration and
/// block until interrupted. Exit codes: 2 if transports fail to open, 130
/// on interrupt (the only way this command ends).
pub async fn execute(config: ClientConfig) -> Result<()> {
    let handles = transports::build(&config.bus).await?;
    let client = Arc::new(
        ClientBuilder::new(config, handles.rpc, handles.result, handles.event, handles.schema).build(),
    );

    client.start().await?;
    info!("lightbus client running; waiting for shutdown signal");

    wait_for_signal().await;

    info!("shutdown signal received; stopping");
    client.stop().await?;
    Err(Interrupted.into())
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
