//! Extraction orchestration
//!
//! The state machine tying a decoded image, a query and the extraction
//! client together.

mod errors;
mod controller;
mod state;

pub use errors::{OrchestratorError, OrchestratorResult};
pub use controller::ExtractionOrchestrator;
pub use state::ProcessingState;
