//! Error types for body extraction and digest delivery

use thiserror::Error;

/// Errors that can occur while extracting or digesting an email
///
/// None of these reach the caller of [`crate::extract_body`]: decoding
/// errors degrade to the undecoded content and every other error degrades
/// to the raw-text fallback.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A header or boundary pattern could not be built
    #[error("Failed to build pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Content declared as base64 is not valid base64
    #[error("Failed to decode base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not valid UTF-8
    #[error("Decoded content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Configuration could not be deserialized
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The summarization collaborator failed
    #[error("Summarizer failed: {0}")]
    Summarizer(String),

    /// The notification collaborator failed
    #[error("Notifier failed: {0}")]
    Notifier(String),

    /// The forwarding collaborator failed
    #[error("Forwarder failed: {0}")]
    Forwarder(String),
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ParseError>;
