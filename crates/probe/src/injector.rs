use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashSet;
use tracing::{debug, info, warn};

use webrec_core_types::{RecError, WindowId};

use crate::script::probe_script;

/// Host capability for running a script inside a window's context.
#[async_trait]
pub trait InjectPort: Send + Sync {
    async fn inject_script(&self, window: &WindowId, script: &str) -> Result<(), RecError>;
}

/// Keeps an active probe in every registered window.
///
/// Injection is idempotent per navigation epoch: a window is marked once the
/// probe lands and the mark is cleared on navigation, which resets the
/// window's execution context. A failed injection leaves the window unmarked
/// so the next navigation retries it.
pub struct InstrumentationInjector {
    port: Arc<dyn InjectPort>,
    injected: DashSet<WindowId>,
}

impl InstrumentationInjector {
    pub fn new(port: Arc<dyn InjectPort>) -> Self {
        Self {
            port,
            injected: DashSet::new(),
        }
    }

    /// Install the probe into a window. Returns whether the window has an
    /// active probe after the call.
    pub async fn inject(&self, window: &WindowId) -> bool {
        if self.injected.contains(window) {
            debug!(window = %window.0, "probe already installed, skipping");
            return true;
        }

        match self.port.inject_script(window, &probe_script(window)).await {
            Ok(()) => {
                self.injected.insert(window.clone());
                info!(window = %window.0, "probe installed");
                true
            }
            Err(err) => {
                warn!(window = %window.0, error = %err, "probe injection failed, will retry on next navigation");
                false
            }
        }
    }

    /// Navigation resets the window's execution context; clear the mark and
    /// reinstall.
    pub async fn on_navigated(&self, window: &WindowId) -> bool {
        self.injected.remove(window);
        self.inject(window).await
    }

    pub fn on_closed(&self, window: &WindowId) {
        self.injected.remove(window);
    }

    pub fn injected_count(&self) -> usize {
        self.injected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct FakePort {
        calls: Mutex<Vec<WindowId>>,
        fail_first: Mutex<bool>,
    }

    impl FakePort {
        fn new(fail_first: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                fail_first: Mutex::new(fail_first),
            })
        }
    }

    #[async_trait]
    impl InjectPort for FakePort {
        async fn inject_script(&self, window: &WindowId, script: &str) -> Result<(), RecError> {
            assert!(script.contains(&window.0));
            self.calls.lock().push(window.clone());
            let mut fail = self.fail_first.lock();
            if *fail {
                *fail = false;
                return Err(RecError::new("window closed mid-injection"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn second_injection_is_skipped() {
        let port = FakePort::new(false);
        let injector = InstrumentationInjector::new(port.clone());
        let window = WindowId("w1".into());

        assert!(injector.inject(&window).await);
        assert!(injector.inject(&window).await);
        assert_eq!(port.calls.lock().len(), 1);
        assert_eq!(injector.injected_count(), 1);
    }

    #[tokio::test]
    async fn navigation_reinjects() {
        let port = FakePort::new(false);
        let injector = InstrumentationInjector::new(port.clone());
        let window = WindowId("w1".into());

        injector.inject(&window).await;
        injector.on_navigated(&window).await;
        assert_eq!(port.calls.lock().len(), 2);
    }

    #[tokio::test]
    async fn failed_injection_retries_on_next_navigation() {
        let port = FakePort::new(true);
        let injector = InstrumentationInjector::new(port.clone());
        let window = WindowId("w1".into());

        assert!(!injector.inject(&window).await);
        assert_eq!(injector.injected_count(), 0);

        assert!(injector.on_navigated(&window).await);
        assert_eq!(port.calls.lock().len(), 2);
        assert_eq!(injector.injected_count(), 1);
    }

    #[tokio::test]
    async fn close_clears_mark() {
        let port = FakePort::new(false);
        let injector = InstrumentationInjector::new(port);
        let window = WindowId("w1".into());

        injector.inject(&window).await;
        injector.on_closed(&window);
        assert_eq!(injector.injected_count(), 0);
    }
}
