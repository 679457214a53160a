//! TIFF file format parsing module
//!
//! This module provides structures and functions for reading
//! TIFF and BigTIFF format files held in memory.

pub mod errors;
pub mod ifd;
pub mod types;
pub mod reader;
pub mod geotags;
pub mod constants;
pub mod geo_key_parser;
pub mod gdal_metadata;
pub(crate) mod validation;
#[cfg(test)]
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use types::{SampleKind, TIFF};
pub use geotags::{get_key_name, GeoKeyEntry, GeoKeyValue};
pub use geo_key_parser::GeoKeyParser;
