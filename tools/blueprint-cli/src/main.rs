//! Blueprint CLI - inspect, split and parse blueprint PNG files
//!
//! # Commands
//!
//! - `blueprint inspect` - List the chunks of a PNG and its payload
//! - `blueprint extract` - Write the data-only file and the image-only preview
//! - `blueprint combine` - Rebuild a blueprint PNG from those two artifacts
//! - `blueprint decode` - Decode the embedded compact payload to JSON
//! - `blueprint parse` - Upload a file to the parsing service and count objects
//!
//! # Usage
//!
//! ```bash
//! # Split a blueprint into factory.png (data) and factory-preview.png (image)
//! blueprint extract factory.png --out-dir out/
//!
//! # Per-item totals from the embedded payload
//! blueprint decode factory.png --summary
//! ```
//!
//! Settings are read from `blueprint.toml` (see [`config`]).

mod combine;
mod config;
mod decode;
mod extract;
mod inspect;
mod parse;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Blueprint CLI - inspect, split and parse blueprint PNG files
#[derive(Parser)]
#[command(name = "blueprint")]
#[command(about = "Inspect, split and parse blueprint PNG files")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./blueprint.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the chunks of a PNG and its embedded payload
    Inspect(inspect::InspectArgs),

    /// Split a blueprint PNG into a data-only file and an image-only preview
    Extract(extract::ExtractArgs),

    /// Rebuild a blueprint PNG from a data-only file and an image-only preview
    Combine(combine::CombineArgs),

    /// Decode the embedded compact payload
    Decode(decode::DecodeArgs),

    /// Send a file to the parsing service and print the result
    Parse(parse::ParseArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::Config::discover(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect(args) => inspect::execute(args, &config),
        Commands::Extract(args) => extract::execute(args, &config),
        Commands::Combine(args) => combine::execute(args, &config),
        Commands::Decode(args) => decode::execute(args, &config),
        Commands::Parse(args) => parse::execute(args, &config),
    }
}
