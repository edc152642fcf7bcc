use webrec_core_types::RawEvent;

use crate::metrics;

/// Event types that can open another window when aimed at an external target.
fn can_spawn_window(event_type: &str) -> bool {
    matches!(event_type, "click" | "submit" | "link_click")
}

/// Tag cross-window relationships across a timestamp-ordered batch.
///
/// For each adjacent pair from different windows closer than `threshold`
/// seconds (exclusive), the later event is marked cross-window. If the
/// earlier event is a click or submit on an element targeting a new browsing
/// context, the later event is attributed to the earlier event's window.
///
/// This is a timing heuristic, not a guarantee.
pub fn tag_cross_window(events: &mut [RawEvent], threshold: f64) {
    for i in 1..events.len() {
        let (prev, rest) = events.split_at_mut(i);
        let prev = &prev[i - 1];
        let event = &mut rest[0];

        if event.window_id == prev.window_id {
            continue;
        }
        if (event.timestamp - prev.timestamp).abs() >= threshold {
            continue;
        }

        event.is_cross_window = true;
        metrics::record_cross_window_tag();

        if can_spawn_window(&prev.event_type) && prev.element.opens_new_window() {
            event.parent_window_id = Some(prev.window_id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webrec_core_types::{ElementDescriptor, EventId, PageContext, WindowId};

    fn event(window: &str, event_type: &str, timestamp: f64, target: &str) -> RawEvent {
        RawEvent {
            event_id: EventId("e".into()),
            window_id: WindowId(window.into()),
            event_type: event_type.into(),
            timestamp,
            element: ElementDescriptor {
                tag: "a".into(),
                target: target.into(),
                ..Default::default()
            },
            page: PageContext::default(),
            extra: serde_json::Value::Null,
            parent_window_id: None,
            is_cross_window: false,
            sequence_number: 0,
        }
    }

    #[test]
    fn close_events_in_different_windows_are_tagged() {
        let mut batch = vec![event("w1", "click", 1.0, ""), event("w2", "load", 2.0, "")];
        tag_cross_window(&mut batch, 2.0);
        assert!(batch[1].is_cross_window);
        assert!(batch[1].parent_window_id.is_none());
    }

    #[test]
    fn gap_at_threshold_is_not_tagged() {
        let mut batch = vec![event("w1", "click", 1.0, ""), event("w2", "load", 3.0, "")];
        tag_cross_window(&mut batch, 2.0);
        assert!(!batch[1].is_cross_window);
    }

    #[test]
    fn gap_above_threshold_is_not_tagged() {
        let mut batch = vec![event("w1", "click", 1.0, ""), event("w2", "load", 3.5, "")];
        tag_cross_window(&mut batch, 2.0);
        assert!(!batch[1].is_cross_window);
    }

    #[test]
    fn blank_target_click_attributes_parent() {
        let mut batch = vec![
            event("w1", "click", 1.0, "_blank"),
            event("w2", "load", 1.5, ""),
        ];
        tag_cross_window(&mut batch, 2.0);
        assert!(batch[1].is_cross_window);
        assert_eq!(batch[1].parent_window_id, Some(WindowId("w1".into())));
    }

    #[test]
    fn same_window_pairs_are_left_alone() {
        let mut batch = vec![
            event("w1", "click", 1.0, "_blank"),
            event("w1", "click", 1.2, ""),
        ];
        tag_cross_window(&mut batch, 2.0);
        assert!(!batch[1].is_cross_window);
    }
}
