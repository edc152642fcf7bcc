//! Replay script generation from ordered action records.

pub mod generator;
pub mod script;

pub use generator::CodeGenerator;
pub use script::{Script, ScriptStep};
