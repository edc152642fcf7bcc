use std::collections::VecDeque;

use webrec_core_types::RawEvent;

/// Ring of recently seen event fingerprints.
///
/// Guards against probes firing the same logical interaction twice, e.g. a
/// click bubbling through a synthetic wrapper element.
pub struct FingerprintRing {
    ring: VecDeque<String>,
    capacity: usize,
}

impl FingerprintRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn contains(&self, fingerprint: &str) -> bool {
        self.ring.iter().any(|f| f == fingerprint)
    }

    pub fn observe(&mut self, fingerprint: String) {
        if self.ring.len() >= self.capacity {
            self.ring.pop_front();
        }
        self.ring.push_back(fingerprint);
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

/// Derive the dedup key from the fields that identify a logical interaction.
pub fn fingerprint(event: &RawEvent) -> String {
    let el = &event.element;
    format!(
        "{}:{}:{}{}{}:{}",
        event.window_id.0, event.event_type, el.tag, el.id, el.class_name, event.page.url
    )
}
