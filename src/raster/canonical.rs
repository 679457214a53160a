//! Canonical image record
//!
//! Every accepted file, photo or GeoTIFF, is decoded into the same RGBA
//! buffer plus dimensions, with georeferencing metadata kept for rasters.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;
use std::path::Path;

use serde::Serialize;

use crate::raster::errors::{DecodeError, DecodeResult};
use crate::tiff::geotags::GeoKeyValue;

/// Which decode path produced an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageFormat {
    /// 8-bit JPEG or PNG photograph
    StandardPhoto,
    /// TIFF or GeoTIFF raster
    GeoRaster,
}

impl ImageFormat {
    /// Pick the format from a file name's extension, case-insensitively
    ///
    /// # Returns
    /// `None` for any extension other than `tif`, `tiff`, `jpg`, `jpeg`
    /// or `png`, and for names without one
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(std::ffi::OsStr::to_str)?
            .to_lowercase();

        match extension.as_str() {
            "tif" | "tiff" => Some(ImageFormat::GeoRaster),
            "jpg" | "jpeg" | "png" => Some(ImageFormat::StandardPhoto),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::StandardPhoto => write!(f, "Standard photo"),
            ImageFormat::GeoRaster => write!(f, "GeoTIFF raster"),
        }
    }
}

/// Georeferencing and descriptive metadata from a GeoTIFF
///
/// Every field is optional on its own; a tag that is missing or fails to
/// parse leaves only its own field empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoMetadata {
    /// GeoKeys by name
    pub geo_keys: BTreeMap<String, GeoKeyValue>,
    /// ImageDescription
    pub description: Option<String>,
    /// Software
    pub software: Option<String>,
    /// DateTime
    pub capture_time: Option<String>,
    /// ModelPixelScale (x, y, z)
    pub pixel_scale: Option<[f64; 3]>,
    /// ModelTiepoint values, six per tiepoint
    pub tie_points: Option<Vec<f64>>,
    /// GDAL metadata items by name
    pub gdal_metadata: BTreeMap<String, String>,
    /// GDAL NoData value as stored
    pub no_data: Option<String>,
}

impl GeoMetadata {
    /// Looks up an integer GeoKey by name
    pub fn geo_key_integer(&self, name: &str) -> Option<u64> {
        self.geo_keys.get(name).and_then(GeoKeyValue::as_integer)
    }

    /// Whether no metadata was found at all
    pub fn is_empty(&self) -> bool {
        *self == GeoMetadata::default()
    }
}

/// The decoded, format-independent image
///
/// Immutable once built: `pixels.len() == width * height * 4` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalImage {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    format: ImageFormat,
    source_byte_size: u64,
    geo_metadata: Option<GeoMetadata>,
    file_name: String,
    band_count: usize,
    bits_per_sample: u16,
}

impl CanonicalImage {
    /// An image decoded from a photograph
    pub fn photo(pixels: Vec<u8>, width: u32, height: u32) -> DecodeResult<Self> {
        Self::new(pixels, width, height, ImageFormat::StandardPhoto, None)
    }

    /// An image decoded from a GeoTIFF, with its metadata
    pub fn geo_raster(pixels: Vec<u8>, width: u32, height: u32, metadata: GeoMetadata) -> DecodeResult<Self> {
        Self::new(pixels, width, height, ImageFormat::GeoRaster, Some(metadata))
    }

    fn new(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        format: ImageFormat,
        geo_metadata: Option<GeoMetadata>,
    ) -> DecodeResult<Self> {
        if width == 0 || height == 0 {
            return Err(DecodeError::CorruptData(format!("Image has no pixels ({}x{})", width, height)));
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| DecodeError::NoRenderContext(format!("{}x{} RGBA buffer overflows", width, height)))?;
        if pixels.len() != expected {
            return Err(DecodeError::NoRenderContext(format!(
                "RGBA buffer holds {} bytes, expected {}", pixels.len(), expected
            )));
        }

        Ok(CanonicalImage {
            pixels,
            width,
            height,
            format,
            source_byte_size: 0,
            geo_metadata,
            file_name: String::new(),
            band_count: 4,
            bits_per_sample: 8,
        })
    }

    /// Records the file the image was decoded from
    pub fn with_source(mut self, file_name: impl Into<String>, source_byte_size: u64) -> Self {
        self.file_name = file_name.into();
        self.source_byte_size = source_byte_size;
        self
    }

    /// Records the band structure of the source
    pub fn with_bands(mut self, band_count: usize, bits_per_sample: u16) -> Self {
        self.band_count = band_count;
        self.bits_per_sample = bits_per_sample;
        self
    }

    /// RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Size of the uploaded file in bytes
    pub fn source_byte_size(&self) -> u64 {
        self.source_byte_size
    }

    /// Metadata, present only for GeoRaster images
    pub fn geo_metadata(&self) -> Option<&GeoMetadata> {
        self.geo_metadata.as_ref()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Bands present in the source file
    pub fn band_count(&self) -> usize {
        self.band_count
    }

    /// Bits per sample in the source file
    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    /// RGBA value of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.pixels[start..start + 4]);
        Some(rgba)
    }

    /// Encode the pixels as a PNG file
    pub fn to_png(&self) -> image::ImageResult<Vec<u8>> {
        let mut png = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut png,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        Ok(png.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(ImageFormat::from_file_name("scene.TIF"), Some(ImageFormat::GeoRaster));
        assert_eq!(ImageFormat::from_file_name("a/b/scene.tiff"), Some(ImageFormat::GeoRaster));
        assert_eq!(ImageFormat::from_file_name("photo.JPeG"), Some(ImageFormat::StandardPhoto));
        assert_eq!(ImageFormat::from_file_name("photo.png"), Some(ImageFormat::StandardPhoto));
        assert_eq!(ImageFormat::from_file_name("scene.bmp"), None);
        assert_eq!(ImageFormat::from_file_name("tiff"), None);
    }

    #[test]
    fn buffer_length_must_match() {
        assert!(CanonicalImage::photo(vec![0; 16], 2, 2).is_ok());
        assert!(matches!(
            CanonicalImage::photo(vec![0; 15], 2, 2),
            Err(DecodeError::NoRenderContext(_))
        ));
        assert!(CanonicalImage::photo(Vec::new(), 0, 2).is_err());
    }

    #[test]
    fn photo_has_no_metadata() {
        let image = CanonicalImage::photo(vec![1, 2, 3, 255], 1, 1).unwrap().with_source("p.png", 70);
        assert!(image.geo_metadata().is_none());
        assert_eq!(image.pixel(0, 0), Some([1, 2, 3, 255]));
        assert_eq!(image.pixel(1, 0), None);
        assert_eq!(image.source_byte_size(), 70);
    }

    #[test]
    fn png_encoding_round_trips_pixels() {
        let pixels = vec![10, 20, 30, 255, 40, 50, 60, 128];
        let image = CanonicalImage::photo(pixels.clone(), 2, 1).unwrap();
        let png = image.to_png().unwrap();

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.into_raw(), pixels);
    }
}
