//! Extract command - split a blueprint into its data and preview artifacts

use crate::config::{Config, read_input};
use anyhow::{Context, Result};
use blueprint_png::{ArtifactNames, extract, verify_preview};
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the extract command
#[derive(Args)]
pub struct ExtractArgs {
    /// Blueprint PNG to split
    pub input: PathBuf,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Decode the preview after writing it to check it renders
    #[arg(long)]
    pub verify: bool,

    /// Replace existing output files
    #[arg(short, long)]
    pub force: bool,
}

pub fn execute(args: ExtractArgs, config: &Config) -> Result<()> {
    let format = config.format()?;
    let bytes = read_input(&args.input, config.limits.max_input_bytes)?;

    let result = match extract(&bytes, &format) {
        Ok(result) => result,
        Err(e) if e.is_not_blueprint() => {
            anyhow::bail!("{} is a plain image, not a blueprint", args.input.display())
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to extract {}", args.input.display())),
    };

    let out_dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None => args.input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let names = ArtifactNames::for_source(&args.input, &format);
    let data_path = out_dir.join(&names.data_file);
    if data_path == args.input && !args.force {
        anyhow::bail!(
            "Data-only output would overwrite the input {}; use --out-dir or --force",
            args.input.display()
        );
    }

    write_output(&data_path, &result.stripped_file, args.force)?;
    println!(
        "  Data:    {} ({} -> {} bytes, {} smaller)",
        data_path.display(),
        result.original_size,
        result.stripped_size,
        result.savings_label()
    );

    match &result.image_blob {
        Some(image) => {
            let preview_path = out_dir.join(&names.preview_file);
            write_output(&preview_path, image, args.force)?;
            println!("  Preview: {} ({} bytes)", preview_path.display(), image.len());

            if args.verify {
                let info = verify_preview(image).context("Preview does not decode")?;
                println!("  Preview decodes: {}x{}", info.width, info.height);
            }
        }
        None => println!("  Preview: none (source has no image data)"),
    }

    tracing::info!(payload = result.payload.len(), "Extraction complete");
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8], force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists; use --force to replace it", path.display());
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
