//! Tile-based raster sample extraction
//!
//! This module implements a reader for tiled TIFF files. Tiled TIFF files
//! organize image data in rectangular tiles of equal size; tiles on the
//! right and bottom edges are padded to the full tile size.

use log::{debug, info};

use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::validation;

use super::bands::RasterBands;
use super::chunk::{self, ChunkSpec};
use super::layout::RasterLayout;

/// Largest accepted TileWidth or TileLength
const MAX_TILE_DIMENSION: u64 = 65536;

/// Reads raster samples from tiled TIFF files
pub struct TileReader<'r, 'a> {
    /// TIFF reader for accessing tag values and tile bytes
    tiff_reader: &'r TiffReader<'a>,
    /// IFD containing the image metadata
    ifd: &'r IFD,
    /// Layout of the raster
    layout: RasterLayout,
}

impl<'r, 'a> TileReader<'r, 'a> {
    /// Create a new tile reader
    ///
    /// # Arguments
    /// * `tiff_reader` - TIFF reader over the file bytes
    /// * `ifd` - IFD containing the image metadata
    /// * `layout` - Layout read from the same IFD
    pub fn new(tiff_reader: &'r TiffReader<'a>, ifd: &'r IFD, layout: RasterLayout) -> Self {
        TileReader { tiff_reader, ifd, layout }
    }

    /// Get tile dimensions from the IFD
    ///
    /// # Returns
    /// Tile width and height in pixels; both tags are required and each
    /// lies in `1..=MAX_TILE_DIMENSION`
    fn get_tile_dimensions(&self) -> TiffResult<(usize, usize)> {
        let tile_width = self.tiff_reader.first_value(self.ifd, tags::TILE_WIDTH)?.unwrap_or(0);
        let tile_height = self.tiff_reader.first_value(self.ifd, tags::TILE_LENGTH)?.unwrap_or(0);
        validation::validate_range(tile_width, 1, MAX_TILE_DIMENSION, "TileWidth")?;
        validation::validate_range(tile_height, 1, MAX_TILE_DIMENSION, "TileLength")?;
        Ok((tile_width as usize, tile_height as usize))
    }

    /// Decode every tile into `bands`
    pub fn extract(&self, bands: &mut RasterBands) -> TiffResult<()> {
        let layout = &self.layout;
        let (tile_width, tile_height) = self.get_tile_dimensions()?;
        let tiles_across = layout.width.div_ceil(tile_width);
        let tiles_down = layout.height.div_ceil(tile_height);
        let tiles_per_plane = tiles_across.checked_mul(tiles_down);
        let tile_count = tiles_per_plane.and_then(|n| n.checked_mul(layout.plane_count()));
        let (tiles_per_plane, tile_count) = match (tiles_per_plane, tile_count) {
            (Some(per_plane), Some(count)) => (per_plane, count),
            _ => return Err(TiffError::GenericError(format!(
                "Tile grid of {}x{} tiles overflows", tiles_across, tiles_down
            ))),
        };

        let compression = layout.compression_handler()?;
        info!("Reading {} tiles of {}x{} with {} compression",
              tile_count, tile_width, tile_height, compression.name());

        let (offsets, byte_counts) = chunk::chunk_tables(
            self.tiff_reader, self.ifd, tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS, tile_count,
        )?;

        let chunk_samples = layout.samples_per_chunk_pixel();
        for plane in 0..layout.plane_count() {
            for tile in 0..tiles_per_plane {
                let index = plane * tiles_per_plane + tile;
                let tile_start_x = (tile % tiles_across) * tile_width;
                let tile_start_y = (tile / tiles_across) * tile_height;

                let samples = chunk::read_chunk(self.tiff_reader, compression.as_ref(), layout, ChunkSpec {
                    index,
                    offset: offsets[index],
                    byte_count: byte_counts[index],
                    row_pixels: tile_width,
                    rows: tile_height,
                })?;
                debug!("Tile {} at ({},{}) decoded", index, tile_start_x, tile_start_y);

                for (i, pixel) in samples.chunks_exact(chunk_samples).enumerate() {
                    let x = tile_start_x + i % tile_width;
                    let y = tile_start_y + i / tile_width;
                    for (s, value) in pixel.iter().enumerate() {
                        bands.set(plane + s, x, y, *value);
                    }
                }
            }
        }

        Ok(())
    }
}
