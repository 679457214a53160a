//! Decode error types

use std::fmt;

use crate::tiff::errors::TiffError;

/// Errors produced while turning an uploaded file into a canonical image
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The file extension is not one of the accepted formats
    UnsupportedFormat(String),
    /// The file could not be parsed as the format its extension claims
    CorruptData(String),
    /// The RGBA buffer could not be built
    NoRenderContext(String),
    /// The file is larger than the configured limit
    FileTooLarge { size: u64, limit: u64 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnsupportedFormat(name) => write!(f, "Unsupported file format: {}", name),
            DecodeError::CorruptData(msg) => write!(f, "Corrupt image data: {}", msg),
            DecodeError::NoRenderContext(msg) => write!(f, "Cannot build pixel buffer: {}", msg),
            DecodeError::FileTooLarge { size, limit } => {
                write!(f, "File is {} bytes, larger than the {} byte limit", size, limit)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<TiffError> for DecodeError {
    fn from(error: TiffError) -> Self {
        DecodeError::CorruptData(error.to_string())
    }
}

impl From<image::ImageError> for DecodeError {
    fn from(error: image::ImageError) -> Self {
        DecodeError::CorruptData(error.to_string())
    }
}

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;
