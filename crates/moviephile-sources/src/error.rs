use moviephile_models::{ListCategory, MediaType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The service answered with a non-success status
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{category} is not available for {media_type}")]
    UnsupportedList {
        category: ListCategory,
        media_type: MediaType,
    },
    #[error("{0}")]
    Other(String),
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        SourceError::Other(message.into())
    }
}
