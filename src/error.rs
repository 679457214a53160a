//! Top-level error type
//!
//! Collects the module errors for the command-line front end.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::extraction::ExtractionError;
use crate::orchestrator::OrchestratorError;
use crate::raster::DecodeError;

/// Any failure surfaced by a command
#[derive(Debug)]
pub enum GeoPixelError {
    Decode(DecodeError),
    Extraction(ExtractionError),
    Orchestrator(OrchestratorError),
    Config(ConfigError),
    Io(io::Error),
    /// Bad command-line usage
    Usage(String),
}

impl fmt::Display for GeoPixelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoPixelError::Decode(e) => write!(f, "Decode error: {}", e),
            GeoPixelError::Extraction(e) => write!(f, "Extraction error: {}", e),
            GeoPixelError::Orchestrator(e) => write!(f, "{}", e),
            GeoPixelError::Config(e) => write!(f, "{}", e),
            GeoPixelError::Io(e) => write!(f, "I/O error: {}", e),
            GeoPixelError::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GeoPixelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoPixelError::Decode(e) => Some(e),
            GeoPixelError::Extraction(e) => Some(e),
            GeoPixelError::Orchestrator(e) => Some(e),
            GeoPixelError::Config(e) => Some(e),
            GeoPixelError::Io(e) => Some(e),
            GeoPixelError::Usage(_) => None,
        }
    }
}

impl From<DecodeError> for GeoPixelError {
    fn from(error: DecodeError) -> Self {
        GeoPixelError::Decode(error)
    }
}

impl From<ExtractionError> for GeoPixelError {
    fn from(error: ExtractionError) -> Self {
        GeoPixelError::Extraction(error)
    }
}

impl From<OrchestratorError> for GeoPixelError {
    fn from(error: OrchestratorError) -> Self {
        GeoPixelError::Orchestrator(error)
    }
}

impl From<ConfigError> for GeoPixelError {
    fn from(error: ConfigError) -> Self {
        GeoPixelError::Config(error)
    }
}

impl From<io::Error> for GeoPixelError {
    fn from(error: io::Error) -> Self {
        GeoPixelError::Io(error)
    }
}

impl From<serde_json::Error> for GeoPixelError {
    fn from(error: serde_json::Error) -> Self {
        GeoPixelError::Io(io::Error::new(io::ErrorKind::InvalidData, error))
    }
}

/// Result type for commands
pub type GeoPixelResult<T> = Result<T, GeoPixelError>;
