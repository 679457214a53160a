//! Compression handling for TIFF raster chunks
//!
//! This module implements strategies for the compression methods a
//! strip or tile may be stored with.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
