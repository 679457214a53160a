//! GeoTIFF metadata and GeoKey parsing
//!
//! This module provides utilities for parsing and interpreting the
//! geographic metadata stored in TIFF files according to the GeoTIFF
//! standard.

use std::collections::BTreeMap;
use log::{debug, warn};

use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::geotags::{get_key_name, GeoKeyEntry, GeoKeyValue};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;

/// Parser for GeoTIFF geographic metadata
pub struct GeoKeyParser;

impl GeoKeyParser {
    /// Parse the GeoKey directory from an IFD
    ///
    /// The directory is a SHORT array: a 4-value header (KeyDirectoryVersion,
    /// KeyRevision, MinorRevision, NumberOfKeys) followed by 4 values per key
    /// (KeyID, TIFFTagLocation, Count, Value_Offset).
    ///
    /// # Returns
    /// The raw key entries, or an empty vector when the IFD has no directory
    pub fn parse_geo_key_directory(reader: &TiffReader, ifd: &IFD) -> TiffResult<Vec<GeoKeyEntry>> {
        if !ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
            return Ok(Vec::new());
        }

        let directory = Self::directory_values(reader, ifd)?;
        if directory.len() < 4 {
            return Err(TiffError::GenericError("Invalid GeoKey directory header".to_string()));
        }

        let num_keys = directory[3] as usize;
        debug!("GeoKey directory: version={}, revision={}.{}, keys={}",
               directory[0], directory[1], directory[2], num_keys);

        let available = (directory.len() - 4) / 4;
        if num_keys > available {
            warn!("GeoKey directory declares {} keys but holds {}", num_keys, available);
        }

        let geo_keys = directory[4..]
            .chunks_exact(4)
            .take(num_keys)
            .map(|key| GeoKeyEntry::new(key[0], key[1], key[2], key[3]))
            .collect();

        Ok(geo_keys)
    }

    /// Resolve all GeoKeys of an IFD into a name → value map
    ///
    /// A key whose value cannot be resolved is logged and left out; it does
    /// not fail the other keys.
    pub fn read_geo_keys(reader: &TiffReader, ifd: &IFD) -> TiffResult<BTreeMap<String, GeoKeyValue>> {
        let entries = Self::parse_geo_key_directory(reader, ifd)?;
        let mut geo_keys = BTreeMap::new();

        for entry in &entries {
            match Self::get_geo_key_value(reader, ifd, entry) {
                Ok(value) => {
                    debug!("GeoKey {} ({}) = {}", entry.key_id, get_key_name(entry.key_id), value);
                    geo_keys.insert(get_key_name(entry.key_id), value);
                }
                Err(e) => warn!("Skipping GeoKey {}: {}", entry.key_id, e),
            }
        }

        Ok(geo_keys)
    }

    /// Get the value of one GeoKey
    ///
    /// GeoKeys can store values in three ways:
    /// 1. Directly in value_offset (tiff_tag_location = 0)
    /// 2. In the GeoKeyDirectory itself or another SHORT tag
    /// 3. In GeoDoubleParamsTag (34736) or GeoAsciiParamsTag (34737)
    pub fn get_geo_key_value(reader: &TiffReader, ifd: &IFD, key_entry: &GeoKeyEntry) -> TiffResult<GeoKeyValue> {
        let start = key_entry.value_offset as usize;
        let count = key_entry.count as usize;

        match key_entry.tiff_tag_location {
            0 => Ok(GeoKeyValue::Integer(key_entry.value_offset as u64)),
            tags::GEO_DOUBLE_PARAMS_TAG => {
                let doubles = reader.read_f64_values(ifd, tags::GEO_DOUBLE_PARAMS_TAG)?;
                let values = Self::window(&doubles, start, count, key_entry.key_id)?;
                Ok(match values {
                    [single] => GeoKeyValue::Double(*single),
                    many => GeoKeyValue::Doubles(many.to_vec()),
                })
            }
            tags::GEO_ASCII_PARAMS_TAG => {
                let ascii = reader.read_ascii(ifd, tags::GEO_ASCII_PARAMS_TAG)?;
                let bytes = ascii.as_bytes();
                let end = (start + count).min(bytes.len());
                if start > end {
                    return Err(TiffError::GenericError(format!(
                        "GeoKey {} text starts past GeoAsciiParams", key_entry.key_id
                    )));
                }
                let text = String::from_utf8_lossy(&bytes[start..end]);
                Ok(GeoKeyValue::Text(text.trim_end_matches(['|', '\0']).to_string()))
            }
            location => {
                let shorts = if location == tags::GEO_KEY_DIRECTORY_TAG {
                    Self::directory_values(reader, ifd)?.into_iter().map(u64::from).collect()
                } else {
                    reader.read_u64_values(ifd, location)?
                };
                let values = Self::window(&shorts, start, count, key_entry.key_id)?;
                Ok(match values {
                    [single] => GeoKeyValue::Integer(*single),
                    many => GeoKeyValue::Integers(many.to_vec()),
                })
            }
        }
    }

    /// Read model pixel scale values (x_scale, y_scale, z_scale)
    ///
    /// ModelPixelScaleTag (33550) holds the pixel size in map units. A tag
    /// with only x and y is padded with a zero z scale.
    pub fn read_model_pixel_scale(reader: &TiffReader, ifd: &IFD) -> TiffResult<[f64; 3]> {
        let values = reader.read_f64_values(ifd, tags::MODEL_PIXEL_SCALE_TAG)?;
        match values.as_slice() {
            [x, y] => Ok([*x, *y, 0.0]),
            [x, y, z, ..] => Ok([*x, *y, *z]),
            _ => Err(TiffError::GenericError(format!(
                "ModelPixelScale has {} values, expected 3", values.len()
            ))),
        }
    }

    /// Read model tiepoint values (i,j,k,x,y,z, ...)
    ///
    /// ModelTiepointTag (33922) links raster to model coordinates, six
    /// values per tiepoint.
    pub fn read_model_tiepoints(reader: &TiffReader, ifd: &IFD) -> TiffResult<Vec<f64>> {
        let values = reader.read_f64_values(ifd, tags::MODEL_TIEPOINT_TAG)?;
        if values.len() % 6 != 0 {
            warn!("ModelTiepoint holds {} values, not a multiple of 6", values.len());
        }
        Ok(values)
    }

    fn directory_values(reader: &TiffReader, ifd: &IFD) -> TiffResult<Vec<u16>> {
        Ok(reader
            .read_u64_values(ifd, tags::GEO_KEY_DIRECTORY_TAG)?
            .into_iter()
            .map(|v| v as u16)
            .collect())
    }

    fn window<T>(values: &[T], start: usize, count: usize, key_id: u16) -> TiffResult<&[T]> {
        values.get(start..start + count).filter(|w| !w.is_empty()).ok_or_else(|| {
            TiffError::GenericError(format!(
                "GeoKey {} references values {}..{} of {}",
                key_id, start, start + count, values.len()
            ))
        })
    }
}
