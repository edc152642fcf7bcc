use async_trait::async_trait;
use webrec_core_types::{RecError, WindowId};

use crate::model::{RegistryStatus, WindowHandle};

/// Lifecycle registry for every window the host reports.
#[async_trait]
pub trait WindowRegistry: Send + Sync {
    /// Register a window. A supplied id is honored for pre-existing windows
    /// (re-registering a known id is an idempotent no-op); otherwise a fresh
    /// id is assigned. The first top-level window becomes the main window.
    async fn register_window(
        &self,
        existing: Option<WindowId>,
        parent: Option<WindowId>,
        url: &str,
        title: &str,
    ) -> Result<WindowHandle, RecError>;

    /// Mark a window closed. The handle stays resolvable via `get` so
    /// historical records keep referencing a valid id.
    async fn on_closed(&self, window: &WindowId) -> Result<WindowHandle, RecError>;

    /// Record a navigation, updating the handle's url.
    async fn on_navigated(&self, window: &WindowId, new_url: &str) -> Result<(), RecError>;

    fn get(&self, window: &WindowId) -> Option<WindowHandle>;
    fn list_active(&self) -> Vec<WindowHandle>;
    fn list_popups(&self) -> Vec<WindowHandle>;
    fn main_window(&self) -> Option<WindowHandle>;
    fn status(&self) -> RegistryStatus;
}
