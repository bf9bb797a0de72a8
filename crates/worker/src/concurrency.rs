use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds the number of concurrently executing handlers per consumer loop to
/// `concurrency`. Fetching from the transport is
/// naturally paused once every permit is checked out, since the loop can't
/// acquire a permit for the next delivery until one is released.
#[derive(Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
}

impl ConcurrencyGate {
    pub fn new(concurrency: usize) -> Self {
        Self { semaphore: Arc::new(Semaphore::new(concurrency.max(1))) }
    }

    /// Wait for a free slot. The returned permit must be held for the
    /// lifetime of one in-flight handler invocation.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore never closed")
    }
}
