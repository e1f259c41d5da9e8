//! Combine command - rebuild a blueprint from a data-only file and a preview

use crate::config::{Config, read_input};
use anyhow::{Context, Result};
use blueprint_png::combine;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the combine command
#[derive(Args)]
pub struct CombineArgs {
    /// Data-only file produced by `extract`
    pub data: PathBuf,

    /// Image-only preview produced by `extract`, or any PNG
    pub image: PathBuf,

    /// Output blueprint PNG
    #[arg(short, long)]
    pub output: PathBuf,
}

pub fn execute(args: CombineArgs, config: &Config) -> Result<()> {
    let format = config.format()?;
    let data = read_input(&args.data, config.limits.max_input_bytes)?;
    let image = read_input(&args.image, config.limits.max_input_bytes)?;

    let combined = combine(&data, &image, &format).with_context(|| {
        format!(
            "Failed to combine {} with {}",
            args.data.display(),
            args.image.display()
        )
    })?;

    std::fs::write(&args.output, &combined)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("  Wrote {} ({} bytes)", args.output.display(), combined.len());
    Ok(())
}
