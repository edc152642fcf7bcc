//! Element analysis: role inference, ranked selector candidates and replay
//! verbs. Pure and deterministic, no host access.

pub mod analyzer;
pub mod roles;
pub mod types;

pub use analyzer::analyze;
pub use roles::infer_role;
pub use types::{ElementAnalysis, Role, Selector, SelectorCandidate, Verb};
