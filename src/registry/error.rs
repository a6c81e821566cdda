use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("an error status code occurred: {status} ({url})")]
    Status { status: StatusCode, url: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RegistryError {
    /// Returns the HTTP status code when the registry answered with an error status
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RegistryError::Status { status, .. } => Some(*status),
            RegistryError::Network(e) => e.status(),
            RegistryError::InvalidResponse(_) => None,
        }
    }
}
