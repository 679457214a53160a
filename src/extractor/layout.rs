//! Raster layout description
//!
//! Collects the tags that decide how raster samples are stored: size,
//! sample kind, interleaving, compression and predictor.

use log::debug;

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::tiff::constants::{compression, planar_config, predictor, sample_format, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::types::SampleKind;
use crate::tiff::validation;

/// Largest number of samples (pixels × bands) one raster may hold
pub const MAX_RASTER_SAMPLES: u64 = 1 << 28;

/// Largest SamplesPerPixel accepted
const MAX_SAMPLES_PER_PIXEL: u64 = 64;

/// How the raster of one IFD is laid out in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterLayout {
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Number of bands (SamplesPerPixel)
    pub samples_per_pixel: usize,
    /// Storage type of each sample
    pub kind: SampleKind,
    /// Whether each band is stored in its own chunks
    pub planar: bool,
    /// Whether horizontal differencing has to be undone
    pub horizontal_predictor: bool,
    /// Compression code of the chunks
    pub compression: u64,
}

impl RasterLayout {
    /// Reads the layout tags of `ifd`
    ///
    /// # Returns
    /// The layout, or an error for missing dimensions and sample layouts
    /// the decoder does not support
    pub fn from_ifd(reader: &TiffReader, ifd: &IFD) -> TiffResult<Self> {
        let width = reader.first_value(ifd, tags::IMAGE_WIDTH)?.unwrap_or(0);
        let height = reader.first_value(ifd, tags::IMAGE_LENGTH)?.unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(TiffError::MissingDimensions);
        }

        let samples_per_pixel = reader.first_value(ifd, tags::SAMPLES_PER_PIXEL)?.unwrap_or(1);
        validation::validate_range(samples_per_pixel, 1, MAX_SAMPLES_PER_PIXEL, "SamplesPerPixel")?;

        let total = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(samples_per_pixel))
            .filter(|&total| total <= MAX_RASTER_SAMPLES)
            .ok_or_else(|| TiffError::GenericError(format!(
                "Raster {}x{} with {} bands is too large to decode", width, height, samples_per_pixel
            )))?;
        debug!("Raster holds {} samples", total);

        let kind = SampleKind::from_tags(Self::bits_per_sample(reader, ifd)?, Self::sample_format(reader, ifd)?)?;

        let planar = match reader.first_value(ifd, tags::PLANAR_CONFIGURATION)?.unwrap_or(1) as u16 {
            planar_config::CHUNKY => false,
            planar_config::PLANAR => true,
            other => {
                return Err(TiffError::UnsupportedSampleLayout(format!("PlanarConfiguration {}", other)))
            }
        };

        let horizontal_predictor = match reader.first_value(ifd, tags::PREDICTOR)?.unwrap_or(1) as u16 {
            predictor::NONE => false,
            predictor::HORIZONTAL_DIFFERENCING if kind.is_integer() => true,
            other => {
                return Err(TiffError::UnsupportedSampleLayout(format!(
                    "Predictor {} with {:?} samples", other, kind
                )))
            }
        };

        let compression = reader.first_value(ifd, tags::COMPRESSION)?.unwrap_or(compression::NONE as u64);

        Ok(RasterLayout {
            width: width as usize,
            height: height as usize,
            samples_per_pixel: samples_per_pixel as usize,
            kind,
            planar,
            horizontal_predictor,
            compression,
        })
    }

    /// Whether the raster is stored in tiles rather than strips
    pub fn is_tiled(ifd: &IFD) -> bool {
        ifd.has_tag(tags::TILE_WIDTH) && ifd.has_tag(tags::TILE_OFFSETS)
    }

    /// The handler for this layout's compression
    pub fn compression_handler(&self) -> TiffResult<Box<dyn CompressionHandler>> {
        CompressionFactory::create_handler(self.compression)
    }

    /// Number of samples stored per pixel within one chunk
    pub fn samples_per_chunk_pixel(&self) -> usize {
        if self.planar { 1 } else { self.samples_per_pixel }
    }

    /// Number of separate chunk planes (one per band when planar)
    pub fn plane_count(&self) -> usize {
        if self.planar { self.samples_per_pixel } else { 1 }
    }

    /// All bands must share one BitsPerSample value
    fn bits_per_sample(reader: &TiffReader, ifd: &IFD) -> TiffResult<u64> {
        if !ifd.has_tag(tags::BITS_PER_SAMPLE) {
            return Ok(1);
        }
        let bits = reader.read_u64_values(ifd, tags::BITS_PER_SAMPLE)?;
        match bits.split_first() {
            Some((first, rest)) if rest.iter().all(|b| b == first) => Ok(*first),
            Some(_) => Err(TiffError::UnsupportedSampleLayout(format!("mixed BitsPerSample {:?}", bits))),
            None => Ok(1),
        }
    }

    fn sample_format(reader: &TiffReader, ifd: &IFD) -> TiffResult<u64> {
        if !ifd.has_tag(tags::SAMPLE_FORMAT) {
            return Ok(sample_format::UNSIGNED as u64);
        }
        let formats = reader.read_u64_values(ifd, tags::SAMPLE_FORMAT)?;
        match formats.split_first() {
            Some((first, rest)) if rest.iter().all(|f| f == first) => Ok(*first),
            Some(_) => Err(TiffError::UnsupportedSampleLayout(format!("mixed SampleFormat {:?}", formats))),
            None => Ok(sample_format::UNSIGNED as u64),
        }
    }
}
