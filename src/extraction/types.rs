//! Extraction request and result types
//!
//! Also holds the JSON shapes exchanged with the remote service, which use
//! camelCase field names.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::raster::CanonicalImage;

/// A query against one decoded image
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// The image to analyze
    pub image: Arc<CanonicalImage>,
    /// Free-text query, non-empty after trimming
    pub query: String,
    /// Optional positive response token budget
    pub max_tokens: Option<u32>,
}

impl ExtractionRequest {
    pub fn new(image: Arc<CanonicalImage>, query: impl Into<String>) -> Self {
        ExtractionRequest { image, query: query.into(), max_tokens: None }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// One labeled polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    pub label: String,
    /// Vertices in image pixel coordinates
    pub polygon: Vec<(i32, i32)>,
    /// In `[0, 1]`
    pub confidence: f64,
}

impl Mask {
    pub fn new(label: &str, polygon: &[(i32, i32)], confidence: f64) -> Self {
        Mask { label: label.to_string(), polygon: polygon.to_vec(), confidence }
    }
}

/// A named scalar fact about the image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub value: String,
}

impl Feature {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Feature { name: name.into(), value: value.into() }
    }
}

/// Whether a result came from the service or from the local synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Remote,
    Fallback,
}

impl fmt::Display for ResultSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultSource::Remote => write!(f, "remote"),
            ResultSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// The answer to an extraction request
///
/// The Nth segmentation marker in `description` corresponds to the Nth
/// mask.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub description: String,
    pub features: Vec<Feature>,
    pub masks: Vec<Mask>,
    /// Overall confidence in `[0, 1]`
    pub confidence: f64,
    /// Seconds spent producing the result
    pub processing_time: f64,
    pub source: ResultSource,
}

/// Request body of `POST /api/extract`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireRequest<'a> {
    /// Base64-encoded PNG
    pub image: String,
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Response body of `POST /api/extract`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireResponse {
    pub description: String,
    #[serde(default)]
    pub masks: Vec<Mask>,
    pub processing_time: f64,
    pub confidence: f64,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl WireResponse {
    /// Convert into a result, clamping scores into range
    pub fn into_result(self) -> ExtractionResult {
        ExtractionResult {
            description: self.description,
            features: self.features,
            masks: self
                .masks
                .into_iter()
                .map(|mask| Mask { confidence: clamp_unit(mask.confidence), ..mask })
                .collect(),
            confidence: clamp_unit(self.confidence),
            processing_time: if self.processing_time.is_finite() { self.processing_time.max(0.0) } else { 0.0 },
            source: ResultSource::Remote,
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
