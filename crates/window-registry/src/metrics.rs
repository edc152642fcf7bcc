use lazy_static::lazy_static;
use prometheus::{core::Collector, IntCounter, IntGauge, Registry};
use tracing::error;

lazy_static! {
    static ref REGISTRY_WINDOWS_ACTIVE: IntGauge =
        IntGauge::new("webrec_registry_windows_active", "Currently active windows").unwrap();
    static ref REGISTRY_POPUPS_ACTIVE: IntGauge =
        IntGauge::new("webrec_registry_popups_active", "Currently active popup windows").unwrap();
    static ref REGISTRY_WINDOWS_REGISTERED: IntCounter = IntCounter::new(
        "webrec_registry_windows_registered_total",
        "Windows registered over the session",
    )
    .unwrap();
}

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register window registry metric");
        }
    }
}

pub fn register_metrics(registry: &Registry) {
    register(registry, REGISTRY_WINDOWS_ACTIVE.clone());
    register(registry, REGISTRY_POPUPS_ACTIVE.clone());
    register(registry, REGISTRY_WINDOWS_REGISTERED.clone());
}

pub fn set_active_count(count: usize) {
    REGISTRY_WINDOWS_ACTIVE.set(count as i64);
}

pub fn set_popup_count(count: usize) {
    REGISTRY_POPUPS_ACTIVE.set(count as i64);
}

pub fn record_registration() {
    REGISTRY_WINDOWS_REGISTERED.inc();
}
