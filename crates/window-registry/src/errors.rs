use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("window not found")]
    NotFound,
    #[error("window already closed")]
    AlreadyClosed,
    #[error("internal error")]
    Internal,
}

impl RegistryError {
    pub fn into_rec_error(self, detail: impl Into<String>) -> webrec_core_types::RecError {
        let message = format!("{}: {}", self, detail.into());
        webrec_core_types::RecError::new(message)
    }
}
