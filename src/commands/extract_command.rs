//! Feature extraction command
//!
//! Loads the input image into an orchestrator, submits the query and prints
//! the grounded answer. A spinner runs while the request is in flight.

use std::path::PathBuf;
use std::sync::Arc;

use clap::ArgMatches;
use log::{debug, info};

use crate::commands::command_traits::Command;
use crate::commands::{input_path, resolve_config};
use crate::config::GeoPixelConfig;
use crate::error::{GeoPixelError, GeoPixelResult};
use crate::extraction::{ground_phrases, plain_description, ExtractionClient, ExtractionResult};
use crate::orchestrator::ExtractionOrchestrator;
use crate::raster::RasterDecoder;
use crate::utils::progress::ProgressTracker;

/// Command for running one query against one image
pub struct ExtractCommand {
    /// Path to the input file
    input_file: PathBuf,
    query: String,
    /// Print JSON instead of text
    json: bool,
    config: GeoPixelConfig,
}

impl ExtractCommand {
    /// Create a new extract command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A new ExtractCommand instance, or a usage error when no query is given
    pub fn new(args: &ArgMatches) -> GeoPixelResult<Self> {
        let query = args
            .get_one::<String>("query")
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| GeoPixelError::Usage("A query is required (use -q/--query, or --analyze)".to_string()))?;

        let input_file = input_path(args)?;
        info!("Input file: {}", input_file.display());

        Ok(ExtractCommand {
            input_file,
            query,
            json: args.get_flag("json"),
            config: resolve_config(args)?,
        })
    }

    async fn run(&self) -> GeoPixelResult<ExtractionResult> {
        let client = ExtractionClient::from_config(&self.config)?;
        debug!("Using extraction endpoint {}", client.endpoint());

        let orchestrator = ExtractionOrchestrator::new(Arc::new(client))
            .with_decoder(RasterDecoder::with_max_file_size(self.config.max_file_size))
            .with_default_max_tokens(self.config.max_tokens);

        orchestrator.load_file(&self.input_file).await?;

        let progress = ProgressTracker::spinner(&format!("Extracting \"{}\"", self.query));
        match orchestrator.submit(&self.query).await {
            Ok(result) => {
                progress.finish(&format!("Done ({})", result.source));
                Ok(result)
            }
            Err(e) => {
                progress.abandon();
                Err(e.into())
            }
        }
    }

    /// Render a result as text
    pub fn render_text(result: &ExtractionResult) -> String {
        let mut lines = vec![
            plain_description(&result.description),
            String::new(),
            format!(
                "Confidence: {:.0}%  Source: {}  Time: {:.2}s",
                result.confidence * 100.0, result.source, result.processing_time
            ),
        ];

        if !result.features.is_empty() {
            lines.push("Features:".to_string());
            for feature in &result.features {
                lines.push(format!("  {}: {}", feature.name, feature.value));
            }
        }

        if !result.masks.is_empty() {
            lines.push("Masks:".to_string());
            let grounded = ground_phrases(result);
            for (index, mask) in result.masks.iter().enumerate() {
                let phrase = grounded.get(index).map(|(phrase, _)| *phrase).unwrap_or(mask.label.as_str());
                lines.push(format!(
                    "  {} ({:.0}%): {} vertices [{}]",
                    mask.label, mask.confidence * 100.0, mask.polygon.len(), phrase
                ));
            }
        }

        lines.join("\n")
    }
}

impl Command for ExtractCommand {
    fn execute(&self) -> GeoPixelResult<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
        let result = runtime.block_on(self.run())?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", Self::render_text(&result));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::cli;
    use crate::extraction::{Mask, ResultSource};

    #[test]
    fn text_pairs_masks_with_phrases() {
        let result = ExtractionResult {
            description: "There are <p>Buildings</p> [SEG] near <p>a river</p> [SEG].".to_string(),
            features: Vec::new(),
            masks: vec![
                Mask::new("Buildings", &[(0, 0), (1, 0), (1, 1)], 0.9),
                Mask::new("Water", &[(2, 2), (3, 2), (3, 3), (2, 3)], 0.8),
            ],
            confidence: 0.87,
            processing_time: 3.0,
            source: ResultSource::Fallback,
        };

        let text = ExtractCommand::render_text(&result);
        assert!(text.starts_with("There are Buildings near a river."));
        assert!(text.contains("Source: fallback"));
        assert!(text.contains("  Water (80%): 4 vertices [a river]"));
    }

    #[test]
    fn blank_query_is_a_usage_error() {
        let args = cli().get_matches_from(["geopixel", "scene.tif", "-q", "  "]);
        assert!(matches!(ExtractCommand::new(&args), Err(GeoPixelError::Usage(_))));
    }
}
