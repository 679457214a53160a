//! Feature extraction
//!
//! The client for the remote extraction service, the local synthesizer it
//! falls back to, and helpers for reading results.

pub mod client;
pub mod errors;
pub mod features;
pub mod markers;
pub mod synthesizer;
pub mod types;

pub use client::{ExtractionClient, FeatureExtractor, EXTRACT_PATH};
pub use errors::{ExtractionError, ExtractionOutcome};
pub use features::image_features;
pub use markers::{ground_phrases, marker_count, plain_description, segment_phrases};
pub use synthesizer::{synthesize, synthesize_with_rng};
pub use types::{ExtractionRequest, ExtractionResult, Feature, Mask, ResultSource};
