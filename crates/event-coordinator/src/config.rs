use std::time::Duration;

/// Tunables for the event coordinator.
///
/// The defaults mirror the values the recorder has been run with in
/// production; they are deliberately configuration rather than constants so
/// bursty multi-window workloads can adjust them.
#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    /// Buffer occupancy that forces a flush.
    pub buffer_capacity: usize,
    /// Maximum age of a batch before the periodic task flushes it.
    pub flush_interval: Duration,
    /// Number of recent event fingerprints retained for deduplication.
    pub dedup_window: usize,
    /// Maximum gap, in seconds, between events in different windows for the
    /// later one to be considered caused by the earlier (exclusive bound).
    pub causality_threshold: f64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 100,
            flush_interval: Duration::from_millis(500),
            dedup_window: 50,
            causality_threshold: 2.0,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }

    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn with_dedup_window(mut self, window: usize) -> Self {
        self.dedup_window = window;
        self
    }

    pub fn with_causality_threshold(mut self, seconds: f64) -> Self {
        self.causality_threshold = seconds;
        self
    }
}
