use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use lightbus_core::{BusError, ClientConfig};
use lightbus_transport::EventTransport;

/// Periodically reassigns pending entries stuck on a crashed replica back to
/// this one. Runs once per `reclaim_interval` for
/// as long as `listener_name` is being consumed.
pub struct ReclaimTask {
    event_transport: Arc<dyn EventTransport>,
    config: Arc<ClientConfig>,
}

impl ReclaimTask {
    pub fn new(event_transport: Arc<dyn EventTransport>, config: Arc<ClientConfig>) -> Self {
        Self { event_transport, config }
    }

    pub async fn run(self: Arc<Self>, listener_name: String, mut shutdown: watch::Receiver<bool>) -> Result<(), BusError> {
        let interval = self.config.worker.reclaim_interval();
        let older_than = self.config.worker.acknowledgement_timeout();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.reclaim_once(&listener_name, older_than).await;
                }
            }
        }

        Ok(())
    }

    async fn reclaim_once(&self, listener_name: &str, older_than: Duration) {
        match self.event_transport.reclaim(listener_name, older_than).await {
            Ok(0) => {}
            Ok(n) => debug!(listener = %listener_name, reclaimed = n, "reclaimed stale pending entries"),
            Err(err) => warn!(listener = %listener_name, error = %err, "reclaim pass failed"),
        }
    }
}
