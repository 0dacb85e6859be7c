//! Error types for notewise.

use thiserror::Error;

/// Result type alias using notewise's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notewise operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Plain-text content was empty, whitespace-only, or not a string
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// Serialized delta was unparsable or structurally malformed
    #[error("Invalid Delta format: {0}")]
    InvalidDocument(String),

    /// Delta parsed fine but carried no text worth enhancing
    #[error("No text content found in Delta to enhance")]
    NoEnhanceableText,

    /// External rewrite call failed, timed out, or returned unusable output
    #[error("Failed to enhance text: {0}")]
    RewriteService(String),

    /// Inference/generation failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than an
    /// upstream or internal failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidContent(_)
                | Error::InvalidDocument(_)
                | Error::NoEnhanceableText
                | Error::InvalidInput(_)
        )
    }

    /// Whether the error came from an external AI provider.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::RewriteService(_) | Error::Inference(_) | Error::Request(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
