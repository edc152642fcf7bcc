use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use webrec_core_types::{ElementDescriptor, EventId, PageContext, RawEvent, WindowId};

use crate::{
    buffer::EventBuffer,
    causality,
    config::CoordinatorConfig,
    dedup::{self, FingerprintRing},
    metrics,
    sink::EventSink,
};

/// Per-window activity summary, kept for diagnostics.
#[derive(Clone, Debug, Default, Serialize)]
pub struct WindowActivity {
    pub last_event_time: f64,
    pub last_event_type: String,
    pub last_url: String,
    pub event_count: u64,
}

/// Diagnostic snapshot of the coordinator.
#[derive(Clone, Debug, Serialize)]
pub struct CoordinatorStatus {
    pub running: bool,
    pub sequence_counter: u64,
    pub pending_events: usize,
    pub window_count: usize,
    pub recent_fingerprints: usize,
    pub buffer_capacity: usize,
    pub flush_interval_ms: u64,
}

/// State mutated under the single-writer lock. Buffer membership, dedup ring
/// and window summaries always change together, so they share one mutex.
struct Inner {
    buffer: EventBuffer,
    recent: FingerprintRing,
    window_states: HashMap<WindowId, WindowActivity>,
    sequence: u64,
}

/// Serialization point for all raw events.
///
/// Every producer funnels through `add_event`; ordering, dedup and causality
/// tagging happen on flush, then registered sinks are notified.
pub struct EventCoordinator {
    config: CoordinatorConfig,
    running: AtomicBool,
    inner: Mutex<Inner>,
    publish: Mutex<()>,
    sinks: RwLock<Vec<Arc<dyn EventSink>>>,
    flush_task: Mutex<Option<JoinHandle<()>>>,
    epoch: Instant,
    epoch_unix: f64,
}

impl EventCoordinator {
    pub fn new(config: CoordinatorConfig) -> Arc<Self> {
        let epoch_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Arc::new(Self {
            inner: Mutex::new(Inner {
                buffer: EventBuffer::new(config.buffer_capacity, config.flush_interval),
                recent: FingerprintRing::new(config.dedup_window),
                window_states: HashMap::new(),
                sequence: 0,
            }),
            publish: Mutex::new(()),
            sinks: RwLock::new(Vec::new()),
            flush_task: Mutex::new(None),
            running: AtomicBool::new(false),
            epoch: Instant::now(),
            epoch_unix,
            config,
        })
    }

    pub fn add_sink(&self, sink: Arc<dyn EventSink>) {
        self.sinks.write().push(sink);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Monotonic wall-clock-anchored timestamp in seconds.
    fn now(&self) -> f64 {
        self.epoch_unix + self.epoch.elapsed().as_secs_f64()
    }

    pub async fn start(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("event coordinator already running");
            return;
        }
        {
            let mut inner = self.inner.lock();
            inner.sequence = 0;
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        let interval = self.config.flush_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(coordinator) = weak.upgrade() else {
                    break;
                };
                if !coordinator.is_running() {
                    break;
                }
                if coordinator.inner.lock().buffer.should_flush() {
                    coordinator.flush_events();
                }
            }
        });
        *self.flush_task.lock() = Some(handle);

        info!("event coordinator started");
    }

    /// Stop the coordinator. Acts as a barrier: buffered events are flushed
    /// and every sink notification for that final batch completes before
    /// this returns.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        let handle = self.flush_task.lock().take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }

        self.flush_events();
        info!("event coordinator stopped");
    }

    /// Buffer an interaction event. Returns the assigned event id, or an
    /// empty id when the coordinator is not running or the event was a
    /// duplicate (acknowledged, not published).
    #[allow(clippy::too_many_arguments)]
    pub fn add_event(
        &self,
        window_id: WindowId,
        event_type: &str,
        url: &str,
        title: &str,
        element: ElementDescriptor,
        extra: Option<serde_json::Value>,
        parent_window_id: Option<WindowId>,
    ) -> EventId {
        if !self.is_running() {
            warn!(event_type, "event coordinator not running, ignoring event");
            return EventId::empty();
        }

        let timestamp = self.now();
        let (event_id, should_flush) = {
            let mut inner = self.inner.lock();
            let sequence = inner.sequence;
            inner.sequence += 1;

            let event_id = EventId(format!(
                "{}_{}_{}",
                window_id.0,
                (timestamp * 1000.0) as u64,
                sequence
            ));
            let is_cross_window = parent_window_id.is_some();
            let event = RawEvent {
                event_id: event_id.clone(),
                window_id: window_id.clone(),
                event_type: event_type.to_string(),
                timestamp,
                element,
                page: PageContext {
                    url: url.to_string(),
                    title: title.to_string(),
                },
                extra: extra.unwrap_or(serde_json::Value::Null),
                parent_window_id,
                is_cross_window,
                sequence_number: sequence,
            };

            let fingerprint = dedup::fingerprint(&event);
            if inner.recent.contains(&fingerprint) {
                debug!(event_id = %event_id.0, "duplicate event absorbed");
                metrics::record_deduped();
                return event_id;
            }
            inner.recent.observe(fingerprint);

            let state = inner.window_states.entry(window_id).or_default();
            state.last_event_time = event.timestamp;
            state.last_event_type = event.event_type.clone();
            state.last_url = event.page.url.clone();
            state.event_count += 1;

            inner.buffer.add(event);
            metrics::record_accepted();
            let should_flush = inner.buffer.should_flush();
            (event_id, should_flush)
        };

        if should_flush {
            self.flush_events();
        }

        event_id
    }

    /// Flush pending events: drain under the buffer lock, tag causality,
    /// then publish under the publish lock so batches never interleave.
    fn flush_events(&self) {
        let mut batch = {
            let mut inner = self.inner.lock();
            inner.buffer.flush()
        };
        if batch.is_empty() {
            return;
        }

        causality::tag_cross_window(&mut batch, self.config.causality_threshold);
        metrics::record_flush();
        debug!(count = batch.len(), "flushing event batch");

        let _guard = self.publish.lock();
        let sinks = self.sinks.read().clone();
        for event in &batch {
            for sink in &sinks {
                sink.on_event(event);
            }
        }
        for sink in &sinks {
            sink.on_batch(&batch);
        }
    }

    pub fn force_flush(&self) {
        self.flush_events();
    }

    pub fn pending_events(&self) -> usize {
        self.inner.lock().buffer.pending()
    }

    pub fn window_state(&self, window: &WindowId) -> Option<WindowActivity> {
        self.inner.lock().window_states.get(window).cloned()
    }

    /// Drop the per-window summary once the window is gone.
    pub fn clear_window_state(&self, window: &WindowId) {
        if self.inner.lock().window_states.remove(window).is_some() {
            debug!(window = %window.0, "cleared window state");
        }
    }

    pub fn status(&self) -> CoordinatorStatus {
        let inner = self.inner.lock();
        CoordinatorStatus {
            running: self.is_running(),
            sequence_counter: inner.sequence,
            pending_events: inner.buffer.pending(),
            window_count: inner.window_states.len(),
            recent_fingerprints: inner.recent.len(),
            buffer_capacity: self.config.buffer_capacity,
            flush_interval_ms: self.config.flush_interval.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Default)]
    struct CollectingSink {
        events: Mutex<Vec<RawEvent>>,
        batches: Mutex<Vec<usize>>,
    }

    impl EventSink for CollectingSink {
        fn on_event(&self, event: &RawEvent) {
            self.events.lock().push(event.clone());
        }

        fn on_batch(&self, events: &[RawEvent]) {
            self.batches.lock().push(events.len());
        }
    }

    fn quiet_config() -> CoordinatorConfig {
        CoordinatorConfig::default().with_flush_interval(Duration::from_secs(3600))
    }

    fn button(id: &str) -> ElementDescriptor {
        ElementDescriptor {
            tag: "button".into(),
            id: id.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn add_event_before_start_returns_empty_id() {
        let coordinator = EventCoordinator::new(quiet_config());
        let id = coordinator.add_event(
            WindowId("w1".into()),
            "click",
            "https://x",
            "X",
            button("b"),
            None,
            None,
        );
        assert!(id.is_empty());
        assert_eq!(coordinator.pending_events(), 0);
    }

    #[tokio::test]
    async fn rapid_identical_events_publish_once() {
        let coordinator = EventCoordinator::new(quiet_config());
        let sink = Arc::new(CollectingSink::default());
        coordinator.add_sink(sink.clone());
        coordinator.start().await;

        for _ in 0..3 {
            let id = coordinator.add_event(
                WindowId("w1".into()),
                "click",
                "https://x",
                "X",
                button("submit-btn"),
                None,
                None,
            );
            assert!(!id.is_empty());
        }
        coordinator.stop().await;

        assert_eq!(sink.events.lock().len(), 1);
    }

    #[tokio::test]
    async fn stop_flushes_buffered_events_before_returning() {
        let coordinator = EventCoordinator::new(quiet_config());
        let sink = Arc::new(CollectingSink::default());
        coordinator.add_sink(sink.clone());
        coordinator.start().await;

        for i in 0..5 {
            coordinator.add_event(
                WindowId("w1".into()),
                "click",
                &format!("https://x/{i}"),
                "X",
                button(&format!("b{i}")),
                None,
                None,
            );
        }
        assert_eq!(coordinator.pending_events(), 5);
        coordinator.stop().await;

        assert_eq!(sink.events.lock().len(), 5);
        assert_eq!(coordinator.pending_events(), 0);
        let times: Vec<f64> = sink.events.lock().iter().map(|e| e.timestamp).collect();
        let mut sorted = times.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(times, sorted);
    }

    #[tokio::test]
    async fn size_trigger_flushes_at_capacity() {
        let config = quiet_config().with_buffer_capacity(3);
        let coordinator = EventCoordinator::new(config);
        let sink = Arc::new(CollectingSink::default());
        coordinator.add_sink(sink.clone());
        coordinator.start().await;

        for i in 0..3 {
            coordinator.add_event(
                WindowId("w1".into()),
                "click",
                "https://x",
                "X",
                button(&format!("b{i}")),
                None,
                None,
            );
        }

        assert_eq!(sink.batches.lock().as_slice(), &[3]);
        coordinator.stop().await;
    }

    #[tokio::test]
    async fn new_window_event_after_blank_click_is_attributed() {
        let coordinator = EventCoordinator::new(quiet_config());
        let sink = Arc::new(CollectingSink::default());
        coordinator.add_sink(sink.clone());
        coordinator.start().await;

        let opener = ElementDescriptor {
            tag: "a".into(),
            text: "Open".into(),
            target: "_blank".into(),
            ..Default::default()
        };
        coordinator.add_event(
            WindowId("w1".into()),
            "click",
            "https://x",
            "X",
            opener,
            None,
            None,
        );
        coordinator.add_event(
            WindowId("w2".into()),
            "load",
            "https://y",
            "Y",
            ElementDescriptor {
                tag: "body".into(),
                ..Default::default()
            },
            None,
            None,
        );
        coordinator.stop().await;

        let events = sink.events.lock();
        assert_eq!(events.len(), 2);
        assert!(events[1].is_cross_window);
        assert_eq!(events[1].parent_window_id, Some(WindowId("w1".into())));
    }

    #[tokio::test]
    async fn window_state_tracks_and_clears() {
        let coordinator = EventCoordinator::new(quiet_config());
        coordinator.start().await;
        let window = WindowId("w1".into());

        coordinator.add_event(
            window.clone(),
            "click",
            "https://x",
            "X",
            button("b"),
            None,
            None,
        );
        let state = coordinator.window_state(&window).unwrap();
        assert_eq!(state.event_count, 1);
        assert_eq!(state.last_event_type, "click");
        assert_eq!(state.last_url, "https://x");

        coordinator.clear_window_state(&window);
        assert!(coordinator.window_state(&window).is_none());
        coordinator.stop().await;
    }

    #[tokio::test]
    async fn sequence_numbers_strictly_increase() {
        let coordinator = EventCoordinator::new(quiet_config());
        let sink = Arc::new(CollectingSink::default());
        coordinator.add_sink(sink.clone());
        coordinator.start().await;

        for i in 0..4 {
            coordinator.add_event(
                WindowId("w1".into()),
                "click",
                "https://x",
                "X",
                button(&format!("b{i}")),
                None,
                None,
            );
        }
        coordinator.stop().await;

        let seqs: Vec<u64> = sink.events.lock().iter().map(|e| e.sequence_number).collect();
        assert_eq!(seqs, vec![0, 1, 2, 3]);
    }
}

