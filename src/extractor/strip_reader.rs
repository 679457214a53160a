//! Strip-based raster sample extraction
//!
//! This module implements a reader for stripped TIFF files. Stripped TIFFs
//! organize image data in horizontal strips across the entire width of the
//! image, which is the traditional TIFF format.

use log::{debug, info};

use crate::tiff::constants::tags;
use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

use super::bands::RasterBands;
use super::chunk::{self, ChunkSpec};
use super::layout::RasterLayout;

/// Reads raster samples from stripped TIFF files
pub struct StripReader<'r, 'a> {
    /// TIFF reader for accessing tag values and strip bytes
    tiff_reader: &'r TiffReader<'a>,
    /// IFD containing the image metadata
    ifd: &'r IFD,
    /// Layout of the raster
    layout: RasterLayout,
}

impl<'r, 'a> StripReader<'r, 'a> {
    /// Create a new strip reader
    ///
    /// # Arguments
    /// * `tiff_reader` - TIFF reader over the file bytes
    /// * `ifd` - IFD containing the image metadata
    /// * `layout` - Layout read from the same IFD
    pub fn new(tiff_reader: &'r TiffReader<'a>, ifd: &'r IFD, layout: RasterLayout) -> Self {
        StripReader { tiff_reader, ifd, layout }
    }

    /// Rows per strip, defaulting to the full image height
    fn rows_per_strip(&self) -> TiffResult<usize> {
        let rows = self.tiff_reader
            .first_value(self.ifd, tags::ROWS_PER_STRIP)?
            .unwrap_or(self.layout.height as u64);
        Ok((rows as usize).clamp(1, self.layout.height))
    }

    /// Decode every strip into `bands`
    ///
    /// Planar files store `strips_per_plane` strips for band 0, then the
    /// same number for band 1, and so on.
    pub fn extract(&self, bands: &mut RasterBands) -> TiffResult<()> {
        let layout = &self.layout;
        let rows_per_strip = self.rows_per_strip()?;
        let strips_per_plane = layout.height.div_ceil(rows_per_strip);
        let strip_count = strips_per_plane * layout.plane_count();

        let compression = layout.compression_handler()?;
        info!("Reading {} strips ({} rows each) with {} compression",
              strip_count, rows_per_strip, compression.name());

        let (offsets, byte_counts) = chunk::chunk_tables(
            self.tiff_reader, self.ifd, tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS, strip_count,
        )?;

        let chunk_samples = layout.samples_per_chunk_pixel();
        for plane in 0..layout.plane_count() {
            for strip in 0..strips_per_plane {
                let index = plane * strips_per_plane + strip;
                let first_row = strip * rows_per_strip;
                let rows = rows_per_strip.min(layout.height - first_row);

                let samples = chunk::read_chunk(self.tiff_reader, compression.as_ref(), layout, ChunkSpec {
                    index,
                    offset: offsets[index],
                    byte_count: byte_counts[index],
                    row_pixels: layout.width,
                    rows,
                })?;
                debug!("Strip {} decoded to {} samples", index, samples.len());

                for (i, pixel) in samples.chunks_exact(chunk_samples).enumerate() {
                    let x = i % layout.width;
                    let y = first_row + i / layout.width;
                    for (s, value) in pixel.iter().enumerate() {
                        bands.set(plane + s, x, y, *value);
                    }
                }
            }
        }

        Ok(())
    }
}
