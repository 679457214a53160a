//! Orchestrator error types

use std::fmt;
use std::io;

use crate::extraction::ExtractionError;
use crate::raster::DecodeError;

/// Rejected or failed orchestrator actions
#[derive(Debug)]
pub enum OrchestratorError {
    /// `submit` without a decoded image
    NoImageLoaded,
    /// `submit` with a blank query
    EmptyQuery,
    /// An action other than observation while a request is processing
    RequestInFlight,
    /// The uploaded file could not be decoded
    Decode(DecodeError),
    /// The extraction client failed locally
    Extraction(ExtractionError),
    /// The input file could not be read
    Io(io::Error),
}

impl fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrchestratorError::NoImageLoaded => write!(f, "No image loaded"),
            OrchestratorError::EmptyQuery => write!(f, "Query is empty"),
            OrchestratorError::RequestInFlight => write!(f, "A request is already being processed"),
            OrchestratorError::Decode(e) => write!(f, "{}", e),
            OrchestratorError::Extraction(e) => write!(f, "{}", e),
            OrchestratorError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrchestratorError::Decode(e) => Some(e),
            OrchestratorError::Extraction(e) => Some(e),
            OrchestratorError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for OrchestratorError {
    fn from(error: DecodeError) -> Self {
        OrchestratorError::Decode(error)
    }
}

impl From<ExtractionError> for OrchestratorError {
    fn from(error: ExtractionError) -> Self {
        OrchestratorError::Extraction(error)
    }
}

impl From<io::Error> for OrchestratorError {
    fn from(error: io::Error) -> Self {
        OrchestratorError::Io(error)
    }
}

/// Result type for orchestrator actions
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
