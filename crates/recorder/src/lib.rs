//! Cross-window recording manager.
//!
//! Wires the window registry, probe injector and event coordinator to one
//! browser host adapter, and exposes the session lifecycle that upper layers
//! drive: start recording, observe actions, stop and receive the generated
//! replay script.

pub mod manager;
pub mod metrics;
pub mod ports;
pub mod session;

pub use manager::{CrossWindowManager, RecordingStats, WindowEvent};
pub use ports::{HostStats, HostWindowEvent, InjectPort, MainWindowSpec, RecorderHost};
pub use session::{RecordingSession, SessionOutcome, SessionState};
