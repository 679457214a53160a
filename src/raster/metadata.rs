//! GeoTIFF metadata extraction
//!
//! Each tag is read on its own. A tag that fails to parse is logged and
//! left empty; it never fails the decode.

use log::{debug, warn};

use crate::raster::canonical::GeoMetadata;
use crate::tiff::constants::tags;
use crate::tiff::errors::TiffResult;
use crate::tiff::gdal_metadata;
use crate::tiff::geo_key_parser::GeoKeyParser;
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::utils::{string_utils, tag_utils};

/// Reads the metadata tags of `ifd`
pub fn read_geo_metadata(reader: &TiffReader, ifd: &IFD) -> GeoMetadata {
    let mut metadata = GeoMetadata::default();

    if let Some(keys) = optional_tag(ifd, tags::GEO_KEY_DIRECTORY_TAG, || GeoKeyParser::read_geo_keys(reader, ifd)) {
        metadata.geo_keys = keys;
    }

    metadata.description = optional_tag(ifd, tags::IMAGE_DESCRIPTION, || reader.read_ascii(ifd, tags::IMAGE_DESCRIPTION));
    metadata.software = optional_tag(ifd, tags::SOFTWARE, || reader.read_ascii(ifd, tags::SOFTWARE));
    metadata.capture_time = optional_tag(ifd, tags::DATE_TIME, || reader.read_ascii(ifd, tags::DATE_TIME));
    metadata.pixel_scale = optional_tag(ifd, tags::MODEL_PIXEL_SCALE_TAG, || GeoKeyParser::read_model_pixel_scale(reader, ifd));
    metadata.tie_points = optional_tag(ifd, tags::MODEL_TIEPOINT_TAG, || GeoKeyParser::read_model_tiepoints(reader, ifd));

    if let Some(items) = optional_tag(ifd, tags::GDAL_METADATA, || {
        reader.read_ascii(ifd, tags::GDAL_METADATA).and_then(|xml| gdal_metadata::parse_gdal_metadata(&xml))
    }) {
        metadata.gdal_metadata = items;
    }

    metadata.no_data = optional_tag(ifd, tags::GDAL_NODATA, || {
        reader.read_ascii(ifd, tags::GDAL_NODATA).map(|text| string_utils::single_line(&text))
    });

    debug!("Read {} GeoKeys, pixel scale {:?}", metadata.geo_keys.len(), metadata.pixel_scale);
    metadata
}

/// Runs `read` when `tag` is present, logging and discarding a failure
fn optional_tag<T>(ifd: &IFD, tag: u16, read: impl FnOnce() -> TiffResult<T>) -> Option<T> {
    if !ifd.has_tag(tag) {
        return None;
    }
    match read() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Skipping {} tag ({}): {}", tag_utils::get_tag_name(tag), tag, e);
            None
        }
    }
}
