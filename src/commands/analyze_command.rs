//! Image analysis command
//!
//! Decodes the input file and prints what GeoPixel knows about it: the
//! canonical image facts, GeoTIFF metadata and the feature summary.

use std::path::PathBuf;

use clap::ArgMatches;
use log::info;
use serde::Serialize;

use crate::commands::command_traits::Command;
use crate::commands::{input_path, resolve_config};
use crate::error::GeoPixelResult;
use crate::extraction::{image_features, Feature};
use crate::raster::{CanonicalImage, GeoMetadata, ImageFormat, RasterDecoder};
use crate::tiff::geotags::{get_model_type_name, get_raster_type_name};

/// Command for inspecting a decoded image
pub struct AnalyzeCommand {
    /// Path to the input file
    input_file: PathBuf,
    /// Print JSON instead of text
    json: bool,
    decoder: RasterDecoder,
}

/// Everything the analysis prints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport<'a> {
    pub file_name: &'a str,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub band_count: usize,
    pub bits_per_sample: u16,
    pub source_byte_size: u64,
    pub metadata: Option<&'a GeoMetadata>,
    pub features: Vec<Feature>,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(image: &'a CanonicalImage) -> Self {
        AnalysisReport {
            file_name: image.file_name(),
            format: image.format(),
            width: image.width(),
            height: image.height(),
            band_count: image.band_count(),
            bits_per_sample: image.bits_per_sample(),
            source_byte_size: image.source_byte_size(),
            metadata: image.geo_metadata(),
            features: image_features(image),
        }
    }
}

impl AnalyzeCommand {
    /// Create a new analyze command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A new AnalyzeCommand instance or an error
    pub fn new(args: &ArgMatches) -> GeoPixelResult<Self> {
        let config = resolve_config(args)?;
        Ok(AnalyzeCommand {
            input_file: input_path(args)?,
            json: args.get_flag("json"),
            decoder: RasterDecoder::with_max_file_size(config.max_file_size),
        })
    }

    fn decode(&self) -> GeoPixelResult<CanonicalImage> {
        let bytes = std::fs::read(&self.input_file)?;
        let file_name = self
            .input_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.decoder.decode(&bytes, &file_name)?)
    }

    /// Render the report as text
    fn render_text(report: &AnalysisReport) -> String {
        let mut lines = vec![
            format!("File: {}", report.file_name),
            format!("Format: {}", report.format),
            format!("Bands: {} x {}-bit", report.band_count, report.bits_per_sample),
        ];

        if let Some(metadata) = report.metadata {
            lines.push("GeoTIFF metadata:".to_string());
            for (name, value) in &metadata.geo_keys {
                let code_name = value.as_integer().and_then(|code| match name.as_str() {
                    "GTModelTypeGeoKey" => get_model_type_name(code as u16),
                    "GTRasterTypeGeoKey" => get_raster_type_name(code as u16),
                    _ => None,
                });
                match code_name {
                    Some(code_name) => lines.push(format!("  {}: {} ({})", name, value, code_name)),
                    None => lines.push(format!("  {}: {}", name, value)),
                }
            }
            if let Some(scale) = metadata.pixel_scale {
                lines.push(format!("  Pixel scale: {}, {}, {}", scale[0], scale[1], scale[2]));
            }
            if let Some(tie_points) = &metadata.tie_points {
                lines.push(format!("  Tie points: {}", tie_points.len() / 6));
            }
            for (label, text) in [
                ("Description", &metadata.description),
                ("Software", &metadata.software),
                ("NoData", &metadata.no_data),
            ] {
                if let Some(text) = text {
                    lines.push(format!("  {}: {}", label, text));
                }
            }
            for (name, value) in &metadata.gdal_metadata {
                lines.push(format!("  GDAL {}: {}", name, value));
            }
        }

        lines.push("Features:".to_string());
        for feature in &report.features {
            lines.push(format!("  {}: {}", feature.name, feature.value));
        }
        lines.join("\n")
    }
}

impl Command for AnalyzeCommand {
    fn execute(&self) -> GeoPixelResult<()> {
        info!("Analyzing {}", self.input_file.display());
        let image = self.decode()?;
        let report = AnalysisReport::new(&image);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", Self::render_text(&report));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiff::GeoKeyValue;

    #[test]
    fn text_report_lists_metadata_and_features() {
        let mut metadata = GeoMetadata {
            pixel_scale: Some([10.0, 10.0, 0.0]),
            software: Some("GDAL".to_string()),
            ..GeoMetadata::default()
        };
        metadata.geo_keys.insert("GTModelTypeGeoKey".to_string(), GeoKeyValue::Integer(1));
        let image = CanonicalImage::geo_raster(vec![0; 16], 2, 2, metadata)
            .unwrap()
            .with_source("scene.tif", 2048)
            .with_bands(3, 16);

        let text = AnalyzeCommand::render_text(&AnalysisReport::new(&image));
        assert!(text.contains("Bands: 3 x 16-bit"));
        assert!(text.contains("Pixel scale: 10, 10, 0"));
        assert!(text.contains("Software: GDAL"));
        assert!(text.contains("GTModelTypeGeoKey: 1 (Projected)"));
        assert!(text.contains("Spatial Resolution: 10m/pixel"));
    }

    #[test]
    fn json_report_uses_camel_case() {
        let image = CanonicalImage::photo(vec![0; 4], 1, 1).unwrap().with_source("p.png", 10);
        let value = serde_json::to_value(AnalysisReport::new(&image)).unwrap();
        assert_eq!(value["fileName"], "p.png");
        assert_eq!(value["format"], "StandardPhoto");
        assert!(value["metadata"].is_null());
    }
}
