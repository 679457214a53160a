//! GeoTIFF key definitions
//!
//! Names for GeoKey IDs and a few code tables, loaded once from the
//! bundled `geotiff_keys.toml`.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::Serialize;

use crate::tiff::errors::{TiffError, TiffResult};

lazy_static! {
    static ref GEOTIFF_DEFINITIONS: GeoTiffDefinitions = {
        let content = include_str!("../../geotiff_keys.toml");
        GeoTiffDefinitions::from_str(content).unwrap_or_else(|e| {
            log::warn!("Failed to parse GeoTIFF key definitions: {}", e);
            GeoTiffDefinitions::default()
        })
    };
}

/// Container for GeoKey names and code tables
#[derive(Debug, Default)]
pub struct GeoTiffDefinitions {
    /// Maps GeoKey IDs to key names
    pub key_names: HashMap<u16, String>,
    /// Maps GTModelTypeGeoKey codes to names
    pub model_type_names: HashMap<u16, String>,
    /// Maps GTRasterTypeGeoKey codes to names
    pub raster_type_names: HashMap<u16, String>,
}

impl GeoTiffDefinitions {
    /// Parse definitions from a TOML string
    pub fn from_str(content: &str) -> TiffResult<Self> {
        let toml_value: toml::Value = content
            .parse()
            .map_err(|e| TiffError::GenericError(format!("Failed to parse TOML: {}", e)))?;

        let mut defs = GeoTiffDefinitions::default();
        Self::parse_code_table(&toml_value, "key_ids", &mut defs.key_names);
        Self::parse_code_table(&toml_value, "model_type_codes", &mut defs.model_type_names);
        Self::parse_code_table(&toml_value, "raster_type_codes", &mut defs.raster_type_names);

        Ok(defs)
    }

    fn parse_code_table(toml_value: &toml::Value, table_name: &str, target: &mut HashMap<u16, String>) {
        if let Some(table) = toml_value.get(table_name).and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(id), Some(name)) = (k.parse::<u16>(), v.as_str()) {
                    target.insert(id, name.to_string());
                }
            }
        }
    }
}

/// Get the name of a GeoKey, or `GeoKey<id>` for unlisted keys
pub fn get_key_name(key_id: u16) -> String {
    GEOTIFF_DEFINITIONS
        .key_names
        .get(&key_id)
        .cloned()
        .unwrap_or_else(|| format!("GeoKey{}", key_id))
}

/// Get the name of a GTModelTypeGeoKey value
pub fn get_model_type_name(code: u16) -> Option<&'static str> {
    GEOTIFF_DEFINITIONS.model_type_names.get(&code).map(String::as_str)
}

/// Get the name of a GTRasterTypeGeoKey value
pub fn get_raster_type_name(code: u16) -> Option<&'static str> {
    GEOTIFF_DEFINITIONS.raster_type_names.get(&code).map(String::as_str)
}

/// One raw entry of the GeoKey directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    /// GeoKey identifier
    pub key_id: u16,
    /// 0 for inline values, otherwise the tag holding the value
    pub tiff_tag_location: u16,
    /// Number of values
    pub count: u16,
    /// Inline value or index into the referenced tag
    pub value_offset: u16,
}

impl GeoKeyEntry {
    /// Creates a new GeoKey entry
    pub fn new(key_id: u16, tiff_tag_location: u16, count: u16, value_offset: u16) -> Self {
        GeoKeyEntry {
            key_id,
            tiff_tag_location,
            count,
            value_offset,
        }
    }
}

/// A resolved GeoKey value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeoKeyValue {
    /// SHORT values stored inline or in the directory itself
    Integer(u64),
    /// Several SHORT values
    Integers(Vec<u64>),
    /// Values from GeoDoubleParams
    Double(f64),
    Doubles(Vec<f64>),
    /// Text from GeoAsciiParams, without the trailing `|`
    Text(String),
}

impl GeoKeyValue {
    /// The value as a single integer, when it is one
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            GeoKeyValue::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for GeoKeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoKeyValue::Integer(v) => write!(f, "{}", v),
            GeoKeyValue::Double(v) => write!(f, "{}", v),
            GeoKeyValue::Text(s) => write!(f, "{}", s),
            GeoKeyValue::Integers(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
            GeoKeyValue::Doubles(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_definitions_name_common_keys() {
        assert_eq!(get_key_name(1024), "GTModelTypeGeoKey");
        assert_eq!(get_key_name(3072), "ProjectedCSTypeGeoKey");
        assert_eq!(get_key_name(9999), "GeoKey9999");
        assert_eq!(get_model_type_name(1), Some("Projected"));
        assert_eq!(get_raster_type_name(2), Some("PixelIsPoint"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(GeoTiffDefinitions::from_str("key_ids = [").is_err());
    }

    #[test]
    fn values_display_plainly() {
        assert_eq!(GeoKeyValue::Integers(vec![1, 2]).to_string(), "1, 2");
        assert_eq!(GeoKeyValue::Text("WGS 84".into()).to_string(), "WGS 84");
    }
}
