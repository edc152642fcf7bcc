use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use webrec_core_types::WindowId;

/// Identity record for one browser window, tab or popup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WindowHandle {
    pub id: WindowId,
    pub parent_id: Option<WindowId>,
    pub url: String,
    pub title: String,
    pub is_popup: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl WindowHandle {
    pub fn new(
        id: WindowId,
        parent_id: Option<WindowId>,
        url: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let is_popup = parent_id.is_some();
        Self {
            id,
            parent_id,
            url: url.into(),
            title: title.into(),
            is_popup,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Diagnostic snapshot of the registry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryStatus {
    pub total_windows: usize,
    pub active_windows: usize,
    pub popup_windows: usize,
    pub main_window_id: Option<WindowId>,
}
