use lazy_static::lazy_static;
use prometheus::{core::Collector, IntCounter, Registry};
use tracing::error;

lazy_static! {
    static ref EVENTS_ACCEPTED: IntCounter = IntCounter::new(
        "webrec_coordinator_events_accepted_total",
        "Events accepted into the buffer",
    )
    .unwrap();
    static ref EVENTS_DEDUPED: IntCounter = IntCounter::new(
        "webrec_coordinator_events_deduped_total",
        "Events dropped by the fingerprint ring",
    )
    .unwrap();
    static ref FLUSHES: IntCounter = IntCounter::new(
        "webrec_coordinator_flushes_total",
        "Buffer flushes performed",
    )
    .unwrap();
    static ref CROSS_WINDOW_TAGS: IntCounter = IntCounter::new(
        "webrec_coordinator_cross_window_tags_total",
        "Events tagged as cross-window during flush",
    )
    .unwrap();
}

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register coordinator metric");
        }
    }
}

pub fn register_metrics(registry: &Registry) {
    register(registry, EVENTS_ACCEPTED.clone());
    register(registry, EVENTS_DEDUPED.clone());
    register(registry, FLUSHES.clone());
    register(registry, CROSS_WINDOW_TAGS.clone());
}

pub fn record_accepted() {
    EVENTS_ACCEPTED.inc();
}

pub fn record_deduped() {
    EVENTS_DEDUPED.inc();
}

pub fn record_flush() {
    FLUSHES.inc();
}

pub fn record_cross_window_tag() {
    CROSS_WINDOW_TAGS.inc();
}
