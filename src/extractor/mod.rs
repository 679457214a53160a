//! Raster sample extraction from TIFF image data
//!
//! This module reads the strips or tiles of one IFD and decodes them into
//! per-band sample planes, whatever the compression, predictor, sample
//! type or interleaving.

mod bands;
mod chunk;
mod layout;
mod predictor;
mod strip_reader;
mod tile_reader;

pub use bands::RasterBands;
pub use layout::{RasterLayout, MAX_RASTER_SAMPLES};
pub use strip_reader::StripReader;
pub use tile_reader::TileReader;

use log::debug;

use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// Facade that picks the strip or tile reader for an IFD
pub struct BandExtractor;

impl BandExtractor {
    /// Decode all bands of `ifd`
    ///
    /// # Returns
    /// The layout that was read and the decoded bands
    pub fn extract(reader: &TiffReader, ifd: &IFD) -> TiffResult<(RasterLayout, RasterBands)> {
        let layout = RasterLayout::from_ifd(reader, ifd)?;
        debug!("Raster layout: {:?}", layout);

        let mut bands = RasterBands::new(layout.width, layout.height, layout.samples_per_pixel);
        if RasterLayout::is_tiled(ifd) {
            TileReader::new(reader, ifd, layout).extract(&mut bands)?;
        } else {
            StripReader::new(reader, ifd, layout).extract(&mut bands)?;
        }

        Ok((layout, bands))
    }
}
