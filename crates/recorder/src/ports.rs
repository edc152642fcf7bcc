use async_trait::async_trait;
use tokio::sync::broadcast;

use webrec_core_types::WindowId;
pub use webrec_probe::InjectPort;

/// Window lifecycle notification from the browser automation host.
#[derive(Clone, Debug)]
pub enum HostWindowEvent {
    Created {
        window: WindowId,
        url: String,
        title: String,
        /// Window that opened this one, when the host can tell.
        opener: Option<WindowId>,
    },
    Navigated {
        window: WindowId,
        url: String,
    },
    Closed {
        window: WindowId,
    },
}

/// Optional host statistics capability. Hosts that can report their own
/// counters implement this and surface it via
/// [`RecorderHost::stats_provider`].
pub trait HostStats: Send + Sync {
    fn host_stats(&self) -> serde_json::Value;
}

/// Adapter over one browser automation host.
///
/// All host-specific plumbing lives behind this trait: window enumeration
/// and lifecycle notifications, script injection, and the relay channel that
/// feeds `record_browser_action`.
#[async_trait]
pub trait RecorderHost: InjectPort {
    /// Subscribe to window lifecycle notifications.
    fn lifecycle_events(&self) -> broadcast::Receiver<HostWindowEvent>;

    /// Statistics capability, when the host supports it.
    fn stats_provider(&self) -> Option<&dyn HostStats> {
        None
    }
}

/// The window recording starts in.
#[derive(Clone, Debug)]
pub struct MainWindowSpec {
    /// Host-assigned id to keep, or `None` for a fresh one.
    pub id: Option<WindowId>,
    pub url: String,
    pub title: String,
}
