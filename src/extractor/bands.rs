//! Decoded raster bands

/// The decoded samples of every band of one raster, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBands {
    width: usize,
    height: usize,
    bands: Vec<Vec<f64>>,
}

impl RasterBands {
    /// Zero-filled bands for a `width` × `height` raster
    pub fn new(width: usize, height: usize, band_count: usize) -> Self {
        RasterBands {
            width,
            height,
            bands: vec![vec![0.0; width * height]; band_count],
        }
    }

    /// Builds bands from already decoded sample planes
    ///
    /// # Returns
    /// `None` when a plane does not hold exactly `width * height` samples
    pub fn from_planes(width: usize, height: usize, bands: Vec<Vec<f64>>) -> Option<Self> {
        if bands.iter().any(|band| band.len() != width * height) {
            return None;
        }
        Some(RasterBands { width, height, bands })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Samples of band `index`, or `None` past the last band
    pub fn band(&self, index: usize) -> Option<&[f64]> {
        self.bands.get(index).map(Vec::as_slice)
    }

    /// Stores one sample; positions outside the raster are ignored
    ///
    /// Tiles at the right and bottom edges are padded past the image, so
    /// callers write whole tiles and let this drop the padding.
    pub fn set(&mut self, band: usize, x: usize, y: usize, value: f64) {
        if x >= self.width || y >= self.height {
            return;
        }
        if let Some(samples) = self.bands.get_mut(band) {
            samples[y * self.width + x] = value;
        }
    }
}
