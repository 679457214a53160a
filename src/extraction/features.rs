//! Scalar image features
//!
//! The feature table shown next to a result, computed from the decoded
//! image rather than from the service response.

use crate::extraction::types::Feature;
use crate::raster::{CanonicalImage, ImageFormat};
use crate::tiff::constants::geo_keys;
use crate::tiff::geotags::get_key_name;

/// EPSG code meaning "user-defined" in GeoTIFF
const USER_DEFINED: u64 = 32767;

/// Compute the feature table of `image`
pub fn image_features(image: &CanonicalImage) -> Vec<Feature> {
    let mut features = vec![
        Feature::new("Image Dimensions", format!("{} × {}", image.width(), image.height())),
        Feature::new("File Size", format!("{:.2} MB", image.source_byte_size() as f64 / (1024.0 * 1024.0))),
        Feature::new("Color Channels", color_channels(image)),
        Feature::new("Pixel Depth", format!("{}-bit", image.bits_per_sample())),
    ];

    if image.format() != ImageFormat::GeoRaster {
        return features;
    }
    let Some(metadata) = image.geo_metadata() else {
        return features;
    };

    if let Some([x_scale, _, _]) = metadata.pixel_scale {
        features.push(Feature::new("Spatial Resolution", format!("{}m/pixel", x_scale)));
    }

    let epsg = [geo_keys::PROJECTED_CS_TYPE, geo_keys::GEOGRAPHIC_TYPE]
        .iter()
        .filter_map(|&key| metadata.geo_key_integer(&get_key_name(key)))
        .find(|&code| code != USER_DEFINED && code != 0);
    if let Some(code) = epsg {
        features.push(Feature::new("Coordinate System", format!("EPSG:{}", code)));
    }

    if let Some(time) = &metadata.capture_time {
        features.push(Feature::new("Capture Time", time.clone()));
    }

    features
}

fn color_channels(image: &CanonicalImage) -> &'static str {
    match image.format() {
        ImageFormat::StandardPhoto => "RGB",
        ImageFormat::GeoRaster => match image.band_count() {
            0..=2 => "Grayscale",
            3 => "RGB",
            _ => "RGB + NIR",
        },
    }
}
