//! Inspect command - chunk listing and payload summary

use crate::config::{Config, read_input};
use anyhow::{Context, Result};
use blueprint_png::{ChunkClass, locate, scan};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Args)]
pub struct InspectArgs {
    /// PNG file to inspect
    pub input: PathBuf,
}

pub fn execute(args: InspectArgs, config: &Config) -> Result<()> {
    let format = config.format()?;
    let bytes = read_input(&args.input, config.limits.max_input_bytes)?;
    let container = scan(&bytes).with_context(|| format!("Failed to scan {}", args.input.display()))?;

    let header = container.header();
    println!("=== {} ===", args.input.display());
    println!(
        "  {}x{}, bit depth {}, color type {}{}",
        header.width,
        header.height,
        header.bit_depth,
        header.color_type,
        if header.interlaced { ", interlaced" } else { "" }
    );
    println!("  {} bytes, {} chunks", bytes.len(), container.chunks().len());
    println!();

    let mut offset = blueprint_png::PNG_SIGNATURE.len();
    for chunk in container.chunks() {
        let class = match chunk.class(&format) {
            ChunkClass::Payload => "payload",
            ChunkClass::Pixel => "pixel",
            ChunkClass::Structural => "structural",
        };
        println!(
            "  {:>10}  {}  {:>10} bytes  {:<10}  crc {:08x}",
            offset,
            chunk.kind(),
            chunk.len(),
            class,
            chunk.crc()
        );
        offset += chunk.encoded_len();
    }
    println!();

    match locate(&container, &format) {
        Ok(located) => {
            println!(
                "  Blueprint payload: {} bytes in {} chunk(s)",
                located.payload_len(),
                located.payload.len()
            );
            if !located.has_image_data() {
                println!("  No image data: extraction will not produce a preview");
            }
        }
        Err(e) if e.is_not_blueprint() => {
            println!("  Not a blueprint: no '{}' chunk", format.payload_tag_str());
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
