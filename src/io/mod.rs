//! I/O utilities for in-memory raster data
//!
//! Uploaded rasters arrive as a complete byte buffer, so all readers in this
//! crate work over borrowed slices rather than files.

pub mod byte_order;
pub mod source;
