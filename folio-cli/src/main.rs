//! Command-line interface for folio
//! Converts content blocks between the server JSON, the editable HTML and the read-only
//! projections.
//!
//! Usage:
//!   folio convert `<path|->` [--from `<format>`] [--to `<format>`] [--config `<file>`] [--base-url `<url>`]
//!   folio formats                                            - List available formats
//!
//! Rejected blocks are reported on stderr and make the command exit non-zero, the others are
//! still written to stdout.

use clap::{Arg, ArgAction, ArgMatches, Command};
use folio::folio::formats::WireFormat;
use folio::FormatRegistry;
use folio_config::{ConfigError, FolioConfig, Loader};
use std::io::Read;
use tracing::{debug, error};

fn main() {
    let matches = Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting folio content blocks")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .about("Convert blocks from one format to another")
                .arg(
                    Arg::new("path")
                        .help("Input file, or '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .short('f')
                        .help("Source format (default from config: wire)"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Target format (default from config: html)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults"),
                )
                .arg(
                    Arg::new("base-url")
                        .long("base-url")
                        .help("Document URL that relative link targets are resolved against"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .help("Indent wire JSON output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("formats").about("List available formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("convert", sub)) => handle_convert_command(sub),
        Some(("formats", _)) => handle_formats_command(),
        _ => unreachable!("clap requires a subcommand"),
    }
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches) {
    let config = load_config(matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    init_logging(&config.logging.level);

    let options = config.parse_options().unwrap_or_else(|e| {
        eprintln!("Invalid base url '{}': {}", config.parsing.base_url, e);
        std::process::exit(1);
    });

    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    let source = read_input(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    });

    let mut registry = FormatRegistry::with_defaults(options);
    registry.register(WireFormat::new(config.convert.pretty_json));

    let from = config.convert.from.as_str();
    let to = config.convert.to.as_str();
    debug!(from, to, path = %path, "converting");

    let conversion = registry.convert(&source, from, to).unwrap_or_else(|e| {
        eprintln!("Conversion error: {}", e);
        eprintln!("\nAvailable formats: {}", registry.list_formats().join(", "));
        std::process::exit(1);
    });

    println!("{}", conversion.output);

    for failure in &conversion.failures {
        error!(index = failure.index, error = %failure.error, "block rejected");
    }
    if !conversion.failures.is_empty() {
        eprintln!("{} block(s) could not be converted", conversion.failures.len());
        std::process::exit(1);
    }
}

/// Handle the formats command
fn handle_formats_command() {
    let registry = FormatRegistry::default();
    println!("Available formats:\n");

    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            let mut modes = Vec::new();
            if format.supports_parsing() {
                modes.push("parse");
            }
            if format.supports_serialization() {
                modes.push("serialize");
            }
            println!("  {} ({})", name, modes.join(", "));
            println!("    {}", format.description());
            println!();
        }
    }
}

fn load_config(matches: &ArgMatches) -> Result<FolioConfig, ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        loader = loader.set_override("parsing.base_url", base_url.as_str())?;
    }
    if let Some(from) = matches.get_one::<String>("from") {
        loader = loader.set_override("convert.from", from.as_str())?;
    }
    if let Some(to) = matches.get_one::<String>("to") {
        loader = loader.set_override("convert.to", to.as_str())?;
    }
    if matches.get_flag("pretty") {
        loader = loader.set_override("convert.pretty_json", true)?;
    }
    loader.build()
}

fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Logs go to stderr so that stdout only carries the converted output.
fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
