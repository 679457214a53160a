use std::path::Path;
use std::process;

use clap::{value_parser, Arg, ArgAction, Command as ClapCommand};
use log::{error, LevelFilter};

use geopixel::commands::{CommandFactory, GeoPixelCommandFactory};
use geopixel::utils::logger::Logger;

fn main() {
    let matches = ClapCommand::new("GeoPixel")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode photos and GeoTIFF rasters and extract features with natural-language queries")
        .arg(
            Arg::new("input")
                .help("Input image (tif, tiff, jpg, jpeg, png)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .help("What to extract, e.g. \"buildings and roads\"")
                .value_name("QUERY")
                .required(false),
        )
        .arg(
            Arg::new("max-tokens")
                .long("max-tokens")
                .help("Response token budget sent to the extraction service")
                .value_name("N")
                .value_parser(value_parser!(u32).range(1..))
                .required(false),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .help("Base URL of the extraction service (overrides GEOPIXEL_API_URL)")
                .value_name("URL")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("analyze")
                .short('a')
                .long("analyze")
                .help("Decode the image and print its facts and metadata")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print JSON output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log records to this file as well as the console")
                .value_name("FILE")
                .required(false),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };
    match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(Path::new(log_file), level) {
                eprintln!("Error setting up logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .init();
        }
    }

    let factory = GeoPixelCommandFactory::new();

    match factory.create_command(&matches) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
