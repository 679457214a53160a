//! Raster decoding and normalization
//!
//! Turns uploaded file bytes into a [`CanonicalImage`]: RGBA pixels,
//! dimensions and, for GeoTIFFs, the georeferencing metadata.

pub mod canonical;
pub mod compose;
pub mod decoder;
pub mod errors;
pub mod metadata;
pub mod normalize;

pub use canonical::{CanonicalImage, GeoMetadata, ImageFormat};
pub use decoder::{decode, RasterDecoder, DEFAULT_MAX_FILE_SIZE};
pub use errors::{DecodeError, DecodeResult};
pub use normalize::normalize;
