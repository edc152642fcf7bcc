//! Tracing and metrics wiring for embedders.

use prometheus::Registry;
use tracing_subscriber::EnvFilter;

/// Install a stderr tracing subscriber honoring `RUST_LOG`, defaulting to
/// `info`. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Register every recorder metric family on the given prometheus registry.
/// Re-registration is tolerated, so sharing a registry across sessions works.
pub fn register_metrics(registry: &Registry) {
    webrec_window_registry::metrics::register_metrics(registry);
    webrec_event_coordinator::metrics::register_metrics(registry);
    webrec_recorder::metrics::register_metrics(registry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_register_twice_without_error() {
        let registry = Registry::new();
        register_metrics(&registry);
        register_metrics(&registry);
        assert!(!registry.gather().is_empty());
    }
}
