//! GeoPixel: decode photographs and GeoTIFF rasters into a canonical RGBA
//! image, and ask an extraction service what is in them.

pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod extractor;
pub mod raster;
pub mod extraction;
pub mod orchestrator;
pub mod commands;
pub mod config;
pub mod error;

pub use config::GeoPixelConfig;
pub use error::{GeoPixelError, GeoPixelResult};
pub use extraction::{ExtractionClient, ExtractionRequest, ExtractionResult, FeatureExtractor, Mask, ResultSource};
pub use orchestrator::{ExtractionOrchestrator, OrchestratorError, ProcessingState};
pub use raster::{decode, normalize, CanonicalImage, DecodeError, GeoMetadata, ImageFormat, RasterDecoder};
pub use tiff::TiffReader;
