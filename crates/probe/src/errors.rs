use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("malformed relay payload")]
    MalformedPayload,
}

impl ProbeError {
    pub fn into_rec_error(self, detail: impl Into<String>) -> webrec_core_types::RecError {
        let message = format!("{}: {}", self, detail.into());
        webrec_core_types::RecError::new(message)
    }
}
