use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use webrec_core_types::{
    ActionRecord, ElementDescriptor, EventId, RawEvent, RecError, SessionId, WindowId,
};
use webrec_event_coordinator::{
    CoordinatorConfig, CoordinatorStatus, EventCoordinator, EventSink,
};
use webrec_probe::{InjectPort, InstrumentationInjector};
use webrec_selector_analyzer::analyze;
use webrec_window_registry::{
    RegistryStatus, WindowHandle, WindowRegistry, WindowRegistryImpl,
};

use crate::metrics;
use crate::ports::{HostWindowEvent, MainWindowSpec, RecorderHost};

const CHANNEL_CAPACITY: usize = 256;

/// Window lifecycle notification rebroadcast to upper-layer observers.
#[derive(Clone, Debug)]
pub enum WindowEvent {
    Created(WindowHandle),
    Navigated { window: WindowId, url: String },
    Closed(WindowHandle),
}

/// Aggregate counters plus per-component status.
#[derive(Clone, Debug, Serialize)]
pub struct RecordingStats {
    pub total_events: u64,
    pub windows_created: u64,
    pub cross_window_events: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,
    pub registry: RegistryStatus,
    pub coordinator: CoordinatorStatus,
    /// Host-side counters, when the host declares the stats capability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<serde_json::Value>,
}

/// Shared between the manager and its coordinator sink.
struct ActionState {
    session: RwLock<SessionId>,
    records: Mutex<Vec<ActionRecord>>,
    actions_tx: broadcast::Sender<ActionRecord>,
    total_events: AtomicU64,
    cross_window_events: AtomicU64,
}

/// Converts flushed raw events into action records, annotates the element
/// role, and fans them out to subscribers.
struct ActionRecorderSink {
    state: Arc<ActionState>,
}

impl EventSink for ActionRecorderSink {
    fn on_event(&self, event: &RawEvent) {
        let session = self.state.session.read().clone();
        let mut record = ActionRecord::from_event(&session, event);
        if let Some(el) = record.element.as_mut() {
            if let Some(role) = analyze(el).role {
                el.role = Some(role.name().to_string());
            }
        }

        self.state.total_events.fetch_add(1, Ordering::Relaxed);
        metrics::record_action();
        if event.is_cross_window {
            self.state.cross_window_events.fetch_add(1, Ordering::Relaxed);
            metrics::record_cross_window();
        }

        self.state.records.lock().push(record.clone());
        let _ = self.state.actions_tx.send(record);
    }

    fn on_batch(&self, events: &[RawEvent]) {
        debug!(count = events.len(), "action batch recorded");
    }
}

struct Wiring {
    host: Arc<dyn RecorderHost>,
    injector: Arc<InstrumentationInjector>,
    pump: JoinHandle<()>,
}

/// Unified entry point for multi-window recording.
///
/// Owns the window registry, the event coordinator and the probe injector,
/// and wires them to one host adapter. One instance serves one recording
/// session at a time; construct more instances for concurrent sessions.
pub struct CrossWindowManager {
    registry: Arc<WindowRegistryImpl>,
    coordinator: Arc<EventCoordinator>,
    actions: Arc<ActionState>,
    windows_tx: broadcast::Sender<WindowEvent>,
    windows_created: AtomicU64,
    start_time: Mutex<Option<DateTime<Utc>>>,
    wiring: Mutex<Option<Wiring>>,
    active: AtomicBool,
}

impl CrossWindowManager {
    pub fn new(config: CoordinatorConfig) -> Arc<Self> {
        let coordinator = EventCoordinator::new(config);
        let (actions_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (windows_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let actions = Arc::new(ActionState {
            session: RwLock::new(SessionId::new()),
            records: Mutex::new(Vec::new()),
            actions_tx,
            total_events: AtomicU64::new(0),
            cross_window_events: AtomicU64::new(0),
        });
        coordinator.add_sink(Arc::new(ActionRecorderSink {
            state: actions.clone(),
        }));

        Arc::new(Self {
            registry: Arc::new(WindowRegistryImpl::new()),
            coordinator,
            actions,
            windows_tx,
            windows_created: AtomicU64::new(0),
            start_time: Mutex::new(None),
            wiring: Mutex::new(None),
            active: AtomicBool::new(false),
        })
    }

    /// Attach to a host and start recording against its main window.
    ///
    /// Fatal when the main window cannot be registered; probe injection
    /// failures are recoverable and retried on the window's next navigation.
    pub async fn initialize<H>(
        self: &Arc<Self>,
        host: Arc<H>,
        main: MainWindowSpec,
    ) -> Result<WindowHandle, RecError>
    where
        H: RecorderHost + 'static,
    {
        if self.active.swap(true, Ordering::SeqCst) {
            return Err(RecError::new("cross-window manager already initialized"));
        }

        info!(url = %main.url, "initializing cross-window manager");
        self.coordinator.start().await;

        let handle = match self
            .registry
            .register_window(main.id.clone(), None, &main.url, &main.title)
            .await
        {
            Ok(handle) => handle,
            Err(err) => {
                self.coordinator.stop().await;
                self.active.store(false, Ordering::SeqCst);
                return Err(RecError::new(format!(
                    "failed to register main window: {}",
                    err
                )));
            }
        };

        let injector = Arc::new(InstrumentationInjector::new(
            host.clone() as Arc<dyn InjectPort>
        ));
        injector.inject(&handle.id).await;

        let dyn_host: Arc<dyn RecorderHost> = host;
        let pump = self.spawn_lifecycle_pump(dyn_host.clone(), injector.clone());
        *self.wiring.lock() = Some(Wiring {
            host: dyn_host,
            injector,
            pump,
        });
        *self.start_time.lock() = Some(Utc::now());

        info!(main_window = %handle.id.0, "cross-window manager ready");
        Ok(handle)
    }

    /// Detach from the host and stop the coordinator. Acts as a barrier:
    /// buffered events are flushed and recorded before this returns.
    pub async fn cleanup(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        info!("cleaning up cross-window manager");

        let wiring = self.wiring.lock().take();
        if let Some(wiring) = wiring {
            wiring.pump.abort();
            let _ = wiring.pump.await;
        }
        self.coordinator.stop().await;

        info!("cross-window manager stopped");
    }

    fn spawn_lifecycle_pump(
        self: &Arc<Self>,
        host: Arc<dyn RecorderHost>,
        injector: Arc<InstrumentationInjector>,
    ) -> JoinHandle<()> {
        let mut lifecycle = host.lifecycle_events();
        let manager = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                match lifecycle.recv().await {
                    Ok(event) => {
                        let Some(manager) = manager.upgrade() else {
                            break;
                        };
                        manager.handle_window_event(event, &injector).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "window lifecycle stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    async fn handle_window_event(&self, event: HostWindowEvent, injector: &InstrumentationInjector) {
        match event {
            HostWindowEvent::Created {
                window,
                url,
                title,
                opener,
            } => {
                match self
                    .registry
                    .register_window(Some(window), opener, &url, &title)
                    .await
                {
                    Ok(handle) => {
                        self.windows_created.fetch_add(1, Ordering::Relaxed);
                        metrics::record_window_created();
                        injector.inject(&handle.id).await;
                        let _ = self.windows_tx.send(WindowEvent::Created(handle));
                    }
                    Err(err) => error!(error = %err, "failed to register new window"),
                }
            }
            HostWindowEvent::Navigated { window, url } => {
                if let Err(err) = self.registry.on_navigated(&window, &url).await {
                    warn!(window = %window.0, error = %err, "navigation for unknown window");
                    return;
                }
                injector.on_navigated(&window).await;
                let _ = self.windows_tx.send(WindowEvent::Navigated { window, url });
            }
            HostWindowEvent::Closed { window } => {
                injector.on_closed(&window);
                self.coordinator.clear_window_state(&window);
                match self.registry.on_closed(&window).await {
                    Ok(handle) => {
                        let _ = self.windows_tx.send(WindowEvent::Closed(handle));
                    }
                    Err(err) => warn!(window = %window.0, error = %err, "close for unknown window"),
                }
            }
        }
    }

    /// Single entry point for probe events relayed by the host.
    ///
    /// Events referencing unregistered or closed windows are orphans:
    /// logged and discarded, acknowledged with an empty id.
    pub fn record_browser_action(
        &self,
        window_id: &WindowId,
        event_type: &str,
        payload: serde_json::Value,
    ) -> EventId {
        let Some(handle) = self.registry.get(window_id) else {
            warn!(window = %window_id.0, event_type, "orphan event for unknown window, discarding");
            return EventId::empty();
        };
        if !handle.is_active {
            warn!(window = %window_id.0, event_type, "orphan event for closed window, discarding");
            return EventId::empty();
        }

        let element: ElementDescriptor = payload
            .get("element")
            .cloned()
            .map(|v| serde_json::from_value(v).unwrap_or_default())
            .unwrap_or_default();
        let url = payload
            .pointer("/page/url")
            .and_then(|v| v.as_str())
            .unwrap_or(&handle.url)
            .to_string();
        let title = payload
            .pointer("/page/title")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let extra = payload.get("eventData").cloned();

        debug!(
            window = %window_id.0,
            event_type,
            element = %element.tag,
            "recording browser action"
        );
        self.coordinator.add_event(
            window_id.clone(),
            event_type,
            &url,
            &title,
            element,
            extra,
            handle.parent_id,
        )
    }

    pub fn get_all_windows(&self) -> Vec<WindowHandle> {
        self.registry.list_active()
    }

    pub fn get_main_window(&self) -> Option<WindowHandle> {
        self.registry.main_window()
    }

    pub fn get_popup_windows(&self) -> Vec<WindowHandle> {
        self.registry.list_popups()
    }

    pub fn get_window(&self, window: &WindowId) -> Option<WindowHandle> {
        self.registry.get(window)
    }

    pub fn recording_stats(&self) -> RecordingStats {
        let start_time = *self.start_time.lock();
        let host = self
            .wiring
            .lock()
            .as_ref()
            .and_then(|w| w.host.stats_provider().map(|s| s.host_stats()));
        RecordingStats {
            total_events: self.actions.total_events.load(Ordering::Relaxed),
            windows_created: self.windows_created.load(Ordering::Relaxed),
            cross_window_events: self.actions.cross_window_events.load(Ordering::Relaxed),
            start_time,
            duration_seconds: start_time.map(|t| {
                (Utc::now() - t).num_milliseconds() as f64 / 1000.0
            }),
            registry: self.registry.status(),
            coordinator: self.coordinator.status(),
            host,
        }
    }

    pub fn force_flush_events(&self) {
        self.coordinator.force_flush();
    }

    pub fn subscribe_actions(&self) -> broadcast::Receiver<ActionRecord> {
        self.actions.actions_tx.subscribe()
    }

    pub fn subscribe_windows(&self) -> broadcast::Receiver<WindowEvent> {
        self.windows_tx.subscribe()
    }

    pub fn is_recording_active(&self) -> bool {
        self.active.load(Ordering::SeqCst) && self.coordinator.is_running()
    }

    /// Bind recorded actions to a session and reset the record log.
    pub(crate) fn begin_session(&self, session: SessionId) {
        *self.actions.session.write() = session;
        self.actions.records.lock().clear();
        self.actions.total_events.store(0, Ordering::Relaxed);
        self.actions.cross_window_events.store(0, Ordering::Relaxed);
        self.windows_created.store(0, Ordering::Relaxed);
    }

    /// Drain the accumulated action records in publish order.
    pub fn take_records(&self) -> Vec<ActionRecord> {
        std::mem::take(&mut *self.actions.records.lock())
    }
}
