//! Band to RGBA composition

use log::warn;

use crate::extractor::RasterBands;
use crate::raster::errors::{DecodeError, DecodeResult};
use crate::raster::normalize::normalize;

/// Compose decoded bands into a row-major RGBA buffer
///
/// Three or more bands map band 0, 1 and 2 to red, green and blue; further
/// bands such as near-infrared are not rendered. One band is drawn as
/// grayscale. Two bands are drawn as grayscale from band 0. Alpha is
/// always opaque.
pub fn compose_rgba(bands: &RasterBands) -> DecodeResult<Vec<u8>> {
    let pixel_count = bands.width().checked_mul(bands.height());
    let len = pixel_count
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| DecodeError::NoRenderContext("pixel count overflows".to_string()))?;

    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|e| DecodeError::NoRenderContext(format!("cannot allocate {} bytes: {}", len, e)))?;

    match bands.band_count() {
        0 => return Err(DecodeError::CorruptData("raster has no bands".to_string())),
        1 | 2 => {
            if bands.band_count() == 2 {
                warn!("Two-band raster rendered as grayscale from band 0");
            }
            let gray = band(bands, 0)?;
            for &value in gray {
                let v = normalize(value);
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        _ => {
            let (red, green, blue) = (band(bands, 0)?, band(bands, 1)?, band(bands, 2)?);
            for ((r, g), b) in red.iter().zip(green).zip(blue) {
                pixels.extend_from_slice(&[normalize(*r), normalize(*g), normalize(*b), 255]);
            }
        }
    }

    if pixels.len() != len {
        return Err(DecodeError::NoRenderContext(format!(
            "composed {} bytes, expected {}", pixels.len(), len
        )));
    }
    Ok(pixels)
}

fn band(bands: &RasterBands, index: usize) -> DecodeResult<&[f64]> {
    bands
        .band(index)
        .ok_or_else(|| DecodeError::CorruptData(format!("band {} missing", index)))
}
