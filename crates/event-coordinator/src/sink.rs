use webrec_core_types::RawEvent;

/// Observer of processed events.
///
/// One interface, one concurrency model: implementations run synchronously on
/// the flushing task and must be fast. Async consumers should bridge through
/// a channel instead of blocking here.
pub trait EventSink: Send + Sync {
    /// Called once per surviving event, in non-decreasing timestamp order
    /// within a batch.
    fn on_event(&self, _event: &RawEvent) {}

    /// Called once per flushed batch, after every `on_event` for the batch.
    fn on_batch(&self, _events: &[RawEvent]) {}
}
