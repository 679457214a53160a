//! Raster decoder
//!
//! Dispatches on the file extension to the photo path (the `image` crate)
//! or the GeoTIFF path (the crate's own TIFF reader), producing a
//! [`CanonicalImage`].

use log::{debug, info};

use crate::extractor::BandExtractor;
use crate::raster::canonical::{CanonicalImage, ImageFormat};
use crate::raster::compose::compose_rgba;
use crate::raster::errors::{DecodeError, DecodeResult};
use crate::raster::metadata::read_geo_metadata;
use crate::tiff::errors::TiffError;
use crate::tiff::reader::TiffReader;

/// Default upload limit (100 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Stateless decoder for uploaded image files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterDecoder {
    max_file_size: u64,
}

impl Default for RasterDecoder {
    fn default() -> Self {
        RasterDecoder { max_file_size: DEFAULT_MAX_FILE_SIZE }
    }
}

impl RasterDecoder {
    /// Creates a decoder with the default size limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a decoder that rejects files larger than `max_file_size` bytes
    pub fn with_max_file_size(max_file_size: u64) -> Self {
        RasterDecoder { max_file_size }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Decode `bytes`, using `file_name` to pick the format
    ///
    /// # Returns
    /// The canonical image, or
    /// * `UnsupportedFormat` for an unrecognised extension, before any parse
    /// * `FileTooLarge` when over the size limit
    /// * `CorruptData` when the file does not parse
    /// * `NoRenderContext` when the RGBA buffer cannot be built
    pub fn decode(&self, bytes: &[u8], file_name: &str) -> DecodeResult<CanonicalImage> {
        let format = ImageFormat::from_file_name(file_name)
            .ok_or_else(|| DecodeError::UnsupportedFormat(file_name.to_string()))?;

        let size = bytes.len() as u64;
        if size > self.max_file_size {
            return Err(DecodeError::FileTooLarge { size, limit: self.max_file_size });
        }

        debug!("Decoding {} ({} bytes) as {}", file_name, size, format);
        let image = match format {
            ImageFormat::StandardPhoto => Self::decode_photo(bytes)?,
            ImageFormat::GeoRaster => Self::decode_geo_raster(bytes)?,
        };

        info!("Decoded {}: {}x{} {}", file_name, image.width(), image.height(), format);
        Ok(image.with_source(file_name, size))
    }

    /// Decode on a blocking worker thread
    pub async fn decode_async(&self, bytes: Vec<u8>, file_name: String) -> DecodeResult<CanonicalImage> {
        let decoder = *self;
        tokio::task::spawn_blocking(move || decoder.decode(&bytes, &file_name))
            .await
            .map_err(|e| DecodeError::NoRenderContext(format!("decode worker failed: {}", e)))?
    }

    fn decode_photo(bytes: &[u8]) -> DecodeResult<CanonicalImage> {
        let reader = image::ImageReader::new(std::io::Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| DecodeError::CorruptData(e.to_string()))?;
        match reader.format() {
            Some(image::ImageFormat::Png | image::ImageFormat::Jpeg) => {}
            Some(other) => {
                return Err(DecodeError::CorruptData(format!("photo holds {:?} data, not PNG or JPEG", other)));
            }
            None => return Err(DecodeError::CorruptData("photo format not recognised".to_string())),
        }
        let photo = reader.decode()?;

        let rgba = photo.to_rgba8();
        let (width, height) = rgba.dimensions();
        CanonicalImage::photo(rgba.into_raw(), width, height)
    }

    fn decode_geo_raster(bytes: &[u8]) -> DecodeResult<CanonicalImage> {
        let reader = TiffReader::new(bytes)?;
        let tiff = reader.read()?;
        let ifd = tiff.main_ifd().ok_or(TiffError::NoImageDirectory)?;
        debug!("Main image directory:\n{}", ifd);

        let metadata = read_geo_metadata(&reader, ifd);
        let (layout, bands) = BandExtractor::extract(&reader, ifd)?;
        let pixels = compose_rgba(&bands)?;

        let width = u32::try_from(layout.width)
            .map_err(|_| DecodeError::NoRenderContext(format!("width {} too large", layout.width)))?;
        let height = u32::try_from(layout.height)
            .map_err(|_| DecodeError::NoRenderContext(format!("height {} too large", layout.height)))?;

        Ok(CanonicalImage::geo_raster(pixels, width, height, metadata)?
            .with_bands(layout.samples_per_pixel, layout.kind.bits()))
    }
}

/// Decode with the default decoder
pub fn decode(bytes: &[u8], file_name: &str) -> DecodeResult<CanonicalImage> {
    RasterDecoder::new().decode(bytes, file_name)
}
