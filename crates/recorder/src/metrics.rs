use lazy_static::lazy_static;
use prometheus::{core::Collector, IntCounter, IntGauge, Registry};
use tracing::error;

lazy_static! {
    static ref RECORDER_EVENTS: IntCounter = IntCounter::new(
        "webrec_recorder_events_total",
        "Action records produced over the session",
    )
    .unwrap();
    static ref RECORDER_CROSS_WINDOW: IntCounter = IntCounter::new(
        "webrec_recorder_cross_window_total",
        "Action records tagged as cross-window",
    )
    .unwrap();
    static ref RECORDER_WINDOWS_CREATED: IntCounter = IntCounter::new(
        "webrec_recorder_windows_created_total",
        "Windows observed during recording",
    )
    .unwrap();
    static ref RECORDER_SESSIONS_ACTIVE: IntGauge = IntGauge::new(
        "webrec_recorder_sessions_active",
        "Recording sessions currently active",
    )
    .unwrap();
}

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register recorder metric");
        }
    }
}

pub fn register_metrics(registry: &Registry) {
    register(registry, RECORDER_EVENTS.clone());
    register(registry, RECORDER_CROSS_WINDOW.clone());
    register(registry, RECORDER_WINDOWS_CREATED.clone());
    register(registry, RECORDER_SESSIONS_ACTIVE.clone());
}

pub fn record_action() {
    RECORDER_EVENTS.inc();
}

pub fn record_cross_window() {
    RECORDER_CROSS_WINDOW.inc();
}

pub fn record_window_created() {
    RECORDER_WINDOWS_CREATED.inc();
}

pub fn session_started() {
    RECORDER_SESSIONS_ACTIVE.inc();
}

pub fn session_stopped() {
    RECORDER_SESSIONS_ACTIVE.dec();
}
