//! Client-side instrumentation probe and injector.
//!
//! The probe is a script installed into every recorded window; it captures
//! interactions and relays them over a one-way console side channel. The
//! [`InstrumentationInjector`] keeps the probe alive across navigations.

pub mod errors;
pub mod injector;
pub mod payload;
pub mod script;

pub use errors::ProbeError;
pub use injector::{InjectPort, InstrumentationInjector};
pub use payload::{parse_console_line, ProbePayload, RELAY_PREFIX};
pub use script::probe_script;
