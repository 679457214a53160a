//! Extraction error types

use std::fmt;

/// Local failures of the extraction client
///
/// A remote service that is down, slow or answering garbage is not an
/// error: the client falls back to the synthesizer instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The request cannot be sent (blank query, zero token budget)
    InvalidRequest(String),
    /// The image could not be re-encoded for upload
    Encoding(String),
    /// The HTTP client could not be constructed
    ClientSetup(String),
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::InvalidRequest(msg) => write!(f, "Invalid extraction request: {}", msg),
            ExtractionError::Encoding(msg) => write!(f, "Failed to encode image for upload: {}", msg),
            ExtractionError::ClientSetup(msg) => write!(f, "Failed to set up extraction client: {}", msg),
        }
    }
}

impl std::error::Error for ExtractionError {}

impl From<image::ImageError> for ExtractionError {
    fn from(error: image::ImageError) -> Self {
        ExtractionError::Encoding(error.to_string())
    }
}

/// Result type for extraction client operations
pub type ExtractionOutcome<T> = Result<T, ExtractionError>;
