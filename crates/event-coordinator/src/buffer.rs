use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::warn;

use webrec_core_types::RawEvent;

/// Bounded, time-windowed holding area for raw events awaiting ordering.
pub struct EventBuffer {
    events: VecDeque<RawEvent>,
    capacity: usize,
    flush_interval: Duration,
    last_flush: Instant,
}

impl EventBuffer {
    pub fn new(capacity: usize, flush_interval: Duration) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            flush_interval,
            last_flush: Instant::now(),
        }
    }

    pub fn add(&mut self, event: RawEvent) {
        if self.events.len() >= self.capacity {
            // Callers flush at capacity, so overflow means a flush was missed.
            warn!(capacity = self.capacity, "event buffer overflow, dropping oldest event");
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn should_flush(&self) -> bool {
        self.events.len() >= self.capacity || self.last_flush.elapsed() >= self.flush_interval
    }

    /// Drain the buffer, sort ascending by timestamp and reset the flush
    /// clock. Sequence numbers break timestamp ties so the sort is total.
    pub fn flush(&mut self) -> Vec<RawEvent> {
        self.last_flush = Instant::now();
        if self.events.is_empty() {
            return Vec::new();
        }
        let mut batch: Vec<RawEvent> = self.events.drain(..).collect();
        batch.sort_by(|a, b| {
            a.timestamp
                .partial_cmp(&b.timestamp)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.sequence_number.cmp(&b.sequence_number))
        });
        batch
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webrec_core_types::{ElementDescriptor, EventId, PageContext, WindowId};

    fn event(seq: u64, timestamp: f64) -> RawEvent {
        RawEvent {
            event_id: EventId(format!("e{seq}")),
            window_id: WindowId("w".into()),
            event_type: "click".into(),
            timestamp,
            element: ElementDescriptor::default(),
            page: PageContext::default(),
            extra: serde_json::Value::Null,
            parent_window_id: None,
            is_cross_window: false,
            sequence_number: seq,
        }
    }

    #[test]
    fn flush_sorts_by_timestamp() {
        let mut buffer = EventBuffer::new(10, Duration::from_secs(60));
        buffer.add(event(0, 3.0));
        buffer.add(event(1, 1.0));
        buffer.add(event(2, 2.0));

        let batch = buffer.flush();
        let times: Vec<f64> = batch.iter().map(|e| e.timestamp).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
        assert_eq!(buffer.pending(), 0);
    }

    #[test]
    fn equal_timestamps_keep_sequence_order() {
        let mut buffer = EventBuffer::new(10, Duration::from_secs(60));
        buffer.add(event(1, 1.0));
        buffer.add(event(0, 1.0));

        let batch = buffer.flush();
        assert_eq!(batch[0].sequence_number, 0);
        assert_eq!(batch[1].sequence_number, 1);
    }

    #[test]
    fn should_flush_on_capacity() {
        let mut buffer = EventBuffer::new(2, Duration::from_secs(60));
        buffer.add(event(0, 1.0));
        assert!(!buffer.should_flush());
        buffer.add(event(1, 2.0));
        assert!(buffer.should_flush());
    }

    #[test]
    fn should_flush_on_elapsed_interval() {
        let mut buffer = EventBuffer::new(100, Duration::from_millis(0));
        buffer.add(event(0, 1.0));
        assert!(buffer.should_flush());
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut buffer = EventBuffer::new(2, Duration::from_secs(60));
        buffer.add(event(0, 1.0));
        buffer.add(event(1, 2.0));
        buffer.add(event(2, 3.0));

        let batch = buffer.flush();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].sequence_number, 1);
    }
}
