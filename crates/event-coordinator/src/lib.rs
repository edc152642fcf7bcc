//! Event buffering, deduplication, ordering and cross-window causality.
//!
//! The [`EventCoordinator`] is the single serialization point for raw
//! interaction events: producers call `add_event` concurrently, batches are
//! flushed on size or time triggers, and surviving events reach registered
//! [`EventSink`]s sorted and causality-tagged.

pub mod buffer;
pub mod causality;
pub mod config;
pub mod coordinator;
pub mod dedup;
pub mod metrics;
pub mod sink;

pub use buffer::EventBuffer;
pub use config::CoordinatorConfig;
pub use coordinator::{CoordinatorStatus, EventCoordinator, WindowActivity};
pub use sink::EventSink;
