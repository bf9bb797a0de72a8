use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::warn;

use lightbus_core::ApiName;

/// Fixed hook points. `Before*` hooks may short-circuit by
/// returning an error; `After*` hooks and `Exception` must not, and any
/// error they return is logged and swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    BeforeServerStart,
    AfterServerStopped,
    BeforeInvocation,
    AfterInvocation,
    BeforeFireEvent,
    AfterFireEvent,
    BeforeListenEvent,
    AfterListenEvent,
    Exception,
}

/// Context passed to a hook; fields are populated per hook point and left
/// at their defaults when not meaningful (e.g. `error` outside `Exception`).
#[derive(Debug, Clone, Default)]
pub struct HookContext {
    pub api_name: Option<ApiName>,
    pub member_name: Option<String>,
    pub error: Option<String>,
}

impl HookContext {
    pub fn for_member(api_name: ApiName, member_name: impl Into<String>) -> Self {
        Self { api_name: Some(api_name), member_name: Some(member_name.into()), error: None }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[async_trait]
pub trait Hook: Send + Sync {
    async fn run(&self, ctx: &HookContext) -> Result<(), String>;
}

#[async_trait]
impl<F, Fut> Hook for F
where
    F: Fn(&HookContext) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<(), String>> + Send,
{
    async fn run(&self, ctx: &HookContext) -> Result<(), String> {
        self(ctx).await
    }
}

/// Ordered before/after hooks at the fixed lifecycle points.
///
/// Registrations are shared read-only after `start()`. Hooks are
/// stored behind `Arc` rather than `Box` so a run can clone the current
/// list out from under the lock before awaiting any hook — holding a
/// `std::sync::RwLockReadGuard` across an `.await` would make the
/// dispatcher's futures non-`Send`.
#[derive(Default)]
pub struct HookBus {
    before_server_start: RwLock<Vec<Arc<dyn Hook>>>,
    after_server_stopped: RwLock<Vec<Arc<dyn Hook>>>,
    before_invocation: RwLock<Vec<Arc<dyn Hook>>>,
    after_invocation: RwLock<Vec<Arc<dyn Hook>>>,
    before_fire_event: RwLock<Vec<Arc<dyn Hook>>>,
    after_fire_event: RwLock<Vec<Arc<dyn Hook>>>,
    before_listen_event: RwLock<Vec<Arc<dyn Hook>>>,
    after_listen_event: RwLock<Vec<Arc<dyn Hook>>>,
    exception: RwLock<Vec<Arc<dyn Hook>>>,
}

impl HookBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, point: HookPoint) -> &RwLock<Vec<Arc<dyn Hook>>> {
        match point {
            HookPoint::BeforeServerStart => &self.before_server_start,
            HookPoint::AfterServerStopped => &self.after_server_stopped,
            HookPoint::BeforeInvocation => &self.before_invocation,
            HookPoint::AfterInvocation => &self.after_invocation,
            HookPoint::BeforeFireEvent => &self.before_fire_event,
            HookPoint::AfterFireEvent => &self.after_fire_event,
            HookPoint::BeforeListenEvent => &self.before_listen_event,
            HookPoint::AfterListenEvent => &self.after_listen_event,
            HookPoint::Exception => &self.exception,
        }
    }

    /// Register in order; `at` selects a fixed hook point.
    pub fn register(&self, at: HookPoint, hook: impl Hook + 'static) {
        self.slot(at).write().expect("hook bus lock poisoned").push(Arc::new(hook));
    }

    /// Run `Before*` hooks in registration order. The first error
    /// short-circuits the remaining hooks and is returned to the caller.
    pub async fn run_before(&self, at: HookPoint, ctx: &HookContext) -> Result<(), String> {
        for hook in self.snapshot(at) {
            hook.run(ctx).await?;
        }
        Ok(())
    }

    /// Run `After*`/`Exception` hooks in reverse registration order. Errors
    /// are logged, never propagated.
    pub async fn run_after(&self, at: HookPoint, ctx: &HookContext) {
        for hook in self.snapshot(at).into_iter().rev() {
            if let Err(err) = hook.run(ctx).await {
                warn!(hook_point = ?at, error = %err, "after-hook raised; logged and ignored");
            }
        }
    }

    fn snapshot(&self, at: HookPoint) -> Vec<Arc<dyn Hook>> {
        self.slot(at).read().expect("hook bus lock poisoned").clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn before_hooks_run_in_registration_order() {
        let bus = HookBus::new();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let o1 = order.clone();
        bus.register(HookPoint::BeforeInvocation, move |_: &HookContext| {
            let o1 = o1.clone();
            async move {
                o1.lock().unwrap().push(1);
                Ok(())
            }
        });
        let o2 = order.clone();
        bus.register(HookPoint::BeforeInvocation, move |_: &HookContext| {
            let o2 = o2.clone();
            async move {
                o2.lock().unwrap().push(2);
                Ok(())
            }
        });

        bus.run_before(HookPoint::BeforeInvocation, &HookContext::default()).await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn after_hooks_run_in_reverse_and_swallow_errors() {
        let bus = HookBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let o1 = order.clone();
        bus.register(HookPoint::AfterInvocation, move |_: &HookContext| {
            let o1 = o1.clone();
            async move {
                o1.lock().unwrap().push(1);
                Err("boom".to_string())
            }
        });
        let o2 = order.clone();
        let c2 = calls.clone();
        bus.register(HookPoint::AfterInvocation, move |_: &HookContext| {
            let o2 = o2.clone();
            let c2 = c2.clone();
            async move {
                c2.fetch_add(1, Ordering::SeqCst);
                o2.lock().unwrap().push(2);
                Ok(())
            }
        });

        bus.run_after(HookPoint::AfterInvocation, &HookContext::default()).await;
        assert_eq!(*order.lock().unwrap(), vec![2, 1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
