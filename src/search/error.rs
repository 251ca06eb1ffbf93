//! Error types for search backend operations

use thiserror::Error;

/// Errors that can occur while talking to the search backend
#[derive(Debug, Error)]
pub enum SearchError {
    /// Client could not be constructed (bad address, TLS setup)
    #[error("connection setup failed: {0}")]
    Connection(String),

    /// Request could not be sent or the response body could not be read
    #[error("failed to search documents: {0}")]
    Transport(String),

    /// Backend answered with a non-success status code
    #[error("search request failed with status code {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("failed to decode search response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SearchError::Decode(e.to_string())
        } else if e.is_builder() {
            SearchError::Connection(e.to_string())
        } else {
            SearchError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        SearchError::Decode(e.to_string())
    }
}
