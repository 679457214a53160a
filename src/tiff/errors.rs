//! Custom error types for TIFF container parsing

use std::fmt;
use std::io;

/// TIFF-specific error types
///
/// These never leave the decoder directly: `raster::DecodeError` folds
/// them into `CorruptData`.
#[derive(Debug)]
pub enum TiffError {
    /// I/O error while reading from the in-memory buffer
    IoError(io::Error),
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// The file holds no image directory
    NoImageDirectory,
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// Unsupported sample layout (bits per sample, sample format, predictor)
    UnsupportedSampleLayout(String),
    /// Image dimensions not found or zero
    MissingDimensions,
    /// An offset/length pair points outside the file
    OutOfBounds { offset: u64, len: u64 },
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::InvalidHeader => write!(f, "Invalid TIFF header"),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::NoImageDirectory => write!(f, "TIFF contains no image directory"),
            TiffError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            TiffError::UnsupportedSampleLayout(msg) => write!(f, "Unsupported sample layout: {}", msg),
            TiffError::MissingDimensions => write!(f, "Image dimensions not found"),
            TiffError::OutOfBounds { offset, len } => {
                write!(f, "Data range {}+{} lies outside the file", offset, len)
            }
            TiffError::GenericError(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

impl From<String> for TiffError {
    fn from(msg: String) -> Self {
        TiffError::GenericError(msg)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;
