use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use parking_lot::RwLock;
use tracing::{debug, info};

use webrec_core_types::{RecError, WindowId};

use crate::{
    api::WindowRegistry,
    errors::RegistryError,
    metrics,
    model::{RegistryStatus, WindowHandle},
};

/// In-memory registry implementation.
///
/// Handles are kept after close; only the active index shrinks, so ids in
/// historical action records always resolve.
pub struct WindowRegistryImpl {
    windows: DashMap<WindowId, Arc<RwLock<WindowHandle>>>,
    active: DashSet<WindowId>,
    main_window: RwLock<Option<WindowId>>,
}

impl WindowRegistryImpl {
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
            active: DashSet::new(),
            main_window: RwLock::new(None),
        }
    }

    fn popup_count(&self) -> usize {
        self.active
            .iter()
            .filter(|id| {
                self.windows
                    .get(id.key())
                    .map(|entry| entry.value().read().is_popup)
                    .unwrap_or(false)
            })
            .count()
    }

    fn sync_metrics(&self) {
        metrics::set_active_count(self.active.len());
        metrics::set_popup_count(self.popup_count());
    }
}

impl Default for WindowRegistryImpl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WindowRegistry for WindowRegistryImpl {
    async fn register_window(
        &self,
        existing: Option<WindowId>,
        parent: Option<WindowId>,
        url: &str,
        title: &str,
    ) -> Result<WindowHandle, RecError> {
        if let Some(id) = &existing {
            if let Some(entry) = self.windows.get(id) {
                debug!(window = %id.0, "window already registered, ignoring");
                return Ok(entry.value().read().clone());
            }
        }

        let id = existing.unwrap_or_else(WindowId::new);
        let parent = parent.filter(|p| self.windows.contains_key(p));
        let handle = WindowHandle::new(id.clone(), parent, url, title);

        {
            let mut main = self.main_window.write();
            if main.is_none() && !handle.is_popup {
                *main = Some(id.clone());
            }
        }

        self.windows
            .insert(id.clone(), Arc::new(RwLock::new(handle.clone())));
        self.active.insert(id.clone());
        metrics::record_registration();
        self.sync_metrics();

        info!(window = %id.0, url = %handle.url, popup = handle.is_popup, "window registered");
        Ok(handle)
    }

    async fn on_closed(&self, window: &WindowId) -> Result<WindowHandle, RecError> {
        let entry = self
            .windows
            .get(window)
            .ok_or_else(|| RegistryError::NotFound.into_rec_error(format!("window {}", window.0)))?;

        let handle = {
            let mut guard = entry.value().write();
            if !guard.is_active {
                return Err(
                    RegistryError::AlreadyClosed.into_rec_error(format!("window {}", window.0))
                );
            }
            guard.is_active = false;
            guard.clone()
        };
        drop(entry);

        self.active.remove(window);
        self.sync_metrics();

        info!(window = %window.0, url = %handle.url, "window closed");
        Ok(handle)
    }

    async fn on_navigated(&self, window: &WindowId, new_url: &str) -> Result<(), RecError> {
        let entry = self
            .windows
            .get(window)
            .ok_or_else(|| RegistryError::NotFound.into_rec_error(format!("window {}", window.0)))?;
        let mut guard = entry.value().write();
        debug!(window = %window.0, from = %guard.url, to = %new_url, "window navigated");
        guard.url = new_url.to_string();
        Ok(())
    }

    fn get(&self, window: &WindowId) -> Option<WindowHandle> {
        self.windows
            .get(window)
            .map(|entry| entry.value().read().clone())
    }

    fn list_active(&self) -> Vec<WindowHandle> {
        self.active
            .iter()
            .filter_map(|id| self.get(id.key()))
            .collect()
    }

    fn list_popups(&self) -> Vec<WindowHandle> {
        self.list_active().into_iter().filter(|w| w.is_popup).collect()
    }

    fn main_window(&self) -> Option<WindowHandle> {
        let main = self.main_window.read().clone();
        main.and_then(|id| self.get(&id))
    }

    fn status(&self) -> RegistryStatus {
        RegistryStatus {
            total_windows: self.windows.len(),
            active_windows: self.active.len(),
            popup_windows: self.popup_count(),
            main_window_id: self.main_window.read().clone(),
        }
    }
}
