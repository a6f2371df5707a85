//! Reporter error types.

use thiserror::Error;

/// Errors that can occur while configuring or running the reporter.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid reporter configuration, rejected at construction
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Network error while sending a batch
    #[error("network error: {0}")]
    Network(String),

    /// The database answered with a non-success status
    #[error("server error: HTTP {0}")]
    Server(u16),

    /// Failed to serialize a batch
    #[error("serialization error: {0}")]
    Serialization(String),
}
