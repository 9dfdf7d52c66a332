use thiserror::Error;

/// Errors returned by a suggestion fetcher
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request was cancelled because newer input superseded it
    #[error("Request cancelled")]
    Cancelled,

    /// Connection, DNS, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("API error ({code}): {message}")]
    Status { code: u16, message: String },

    /// Backend answered with a body we could not decode
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// Contract violations when driving a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("suggestion controller has been disposed")]
    Disposed,

    #[error("suggestion controller must be created inside a tokio runtime")]
    NoRuntime,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
