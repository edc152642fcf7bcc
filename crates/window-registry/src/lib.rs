//! Window lifecycle registry for the WebRec recording engine.

pub mod api;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod state;

pub use api::WindowRegistry;
pub use errors::RegistryError;
pub use model::{RegistryStatus, WindowHandle};
pub use state::WindowRegistryImpl;
