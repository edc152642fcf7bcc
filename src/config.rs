use std::time::Duration;

use serde::{Deserialize, Serialize};

use webrec_event_coordinator::CoordinatorConfig;

/// Top-level recording configuration.
///
/// Deserializable so embedders can load it from whatever config source they
/// use; defaults match the tuned values of the coordinator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Events buffered before a size-triggered flush.
    pub buffer_capacity: usize,
    /// Milliseconds between time-triggered flushes.
    pub flush_interval_ms: u64,
    /// Fingerprints kept for duplicate detection.
    pub dedup_window: usize,
    /// Seconds within which a popup event is attributed to the previous
    /// window's action.
    pub causality_threshold_secs: f64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        let coordinator = CoordinatorConfig::default();
        Self {
            buffer_capacity: coordinator.buffer_capacity,
            flush_interval_ms: coordinator.flush_interval.as_millis() as u64,
            dedup_window: coordinator.dedup_window,
            causality_threshold_secs: coordinator.causality_threshold,
        }
    }
}

impl RecorderConfig {
    pub fn coordinator(&self) -> CoordinatorConfig {
        CoordinatorConfig::default()
            .with_buffer_capacity(self.buffer_capacity)
            .with_flush_interval(Duration::from_millis(self.flush_interval_ms))
            .with_dedup_window(self.dedup_window)
            .with_causality_threshold(self.causality_threshold_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_coordinator_defaults() {
        let config = RecorderConfig::default();
        assert_eq!(config.buffer_capacity, 100);
        assert_eq!(config.flush_interval_ms, 500);
        assert_eq!(config.dedup_window, 50);
        assert_eq!(config.causality_threshold_secs, 2.0);
    }

    #[test]
    fn deserializes_partial_overrides() {
        let config: RecorderConfig =
            serde_json::from_str(r#"{"buffer_capacity": 10}"#).unwrap();
        assert_eq!(config.buffer_capacity, 10);
        assert_eq!(config.dedup_window, 50);
        assert_eq!(config.coordinator().buffer_capacity, 10);
    }
}
