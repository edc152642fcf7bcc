//! WebRec: cross-window interaction recording and replay script generation.
//!
//! Attach a [`RecordingSession`] to a browser host adapter, let the probe
//! relay user interactions from every window and popup, and receive an
//! ordered, deduplicated, causality-tagged list of [`ActionRecord`]s plus a
//! generated replay [`Script`] when the session stops.
//!
//! The facade re-exports the member crates; most integrations only need
//! [`RecordingSession`], [`RecorderHost`] and [`RecorderConfig`].

pub mod config;
pub mod telemetry;

pub use config::RecorderConfig;

pub use webrec_codegen::{CodeGenerator, Script, ScriptStep};
pub use webrec_core_types::{
    ActionId, ActionRecord, BoundingBox, ElementDescriptor, EventId, PageContext, RawEvent,
    RecError, SessionId, WindowId,
};
pub use webrec_event_coordinator::{
    CoordinatorConfig, CoordinatorStatus, EventCoordinator, EventSink, WindowActivity,
};
pub use webrec_probe::{
    parse_console_line, probe_script, InjectPort, InstrumentationInjector, ProbePayload,
    RELAY_PREFIX,
};
pub use webrec_recorder::{
    CrossWindowManager, HostStats, HostWindowEvent, MainWindowSpec, RecorderHost,
    RecordingSession, RecordingStats, SessionOutcome, SessionState, WindowEvent,
};
pub use webrec_selector_analyzer::{
    analyze, ElementAnalysis, Role, Selector, SelectorCandidate, Verb,
};
pub use webrec_window_registry::{
    RegistryStatus, WindowHandle, WindowRegistry, WindowRegistryImpl,
};
