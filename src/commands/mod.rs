//! CLI command implementations
//!
//! This module contains the commands supported by the CLI application,
//! using the Command pattern.

pub mod analyze_command;
pub mod command_traits;
pub mod extract_command;

pub use analyze_command::AnalyzeCommand;
pub use command_traits::{Command, CommandFactory};
pub use extract_command::ExtractCommand;

use std::path::PathBuf;

use clap::ArgMatches;
use log::debug;

use crate::config::GeoPixelConfig;
use crate::error::{GeoPixelError, GeoPixelResult};

/// Factory for creating command instances based on CLI arguments
///
/// `--analyze` selects the analysis command; anything else runs an
/// extraction.
#[derive(Debug, Default)]
pub struct GeoPixelCommandFactory;

impl GeoPixelCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        GeoPixelCommandFactory
    }
}

impl CommandFactory for GeoPixelCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> GeoPixelResult<Box<dyn Command>> {
        if args.get_flag("analyze") {
            Ok(Box::new(AnalyzeCommand::new(args)?))
        } else {
            Ok(Box::new(ExtractCommand::new(args)?))
        }
    }
}

/// The input file argument
pub(crate) fn input_path(args: &ArgMatches) -> GeoPixelResult<PathBuf> {
    args.get_one::<String>("input")
        .map(PathBuf::from)
        .ok_or_else(|| GeoPixelError::Usage("Missing input file".to_string()))
}

/// Configuration from file and environment, with command-line overrides
pub(crate) fn resolve_config(args: &ArgMatches) -> GeoPixelResult<GeoPixelConfig> {
    let file = args.get_one::<String>("config").map(PathBuf::from);
    let mut config = GeoPixelConfig::load(file.as_deref())?;

    if let Some(endpoint) = args.get_one::<String>("endpoint") {
        config.endpoint = endpoint.trim().to_string();
    }
    if let Some(max_tokens) = args.get_one::<u32>("max-tokens") {
        config.max_tokens = Some(*max_tokens);
    }
    config.validate()?;

    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}
