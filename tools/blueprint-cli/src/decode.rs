//! Decode command - expand the compact payload of a blueprint
//!
//! Accepts a blueprint PNG, a data-only file, or a bare compact JSON document.

use crate::config::{Config, read_input};
use anyhow::{Context, Result};
use blueprint_compact::{CompactPayload, CountFields, DecodedPayload, records, summarize};
use blueprint_png::{PNG_SIGNATURE, locate, scan};
use blueprint_shared::{ItemCatalog, ObjectCount};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the decode command
#[derive(Args)]
pub struct DecodeArgs {
    /// Blueprint PNG, data-only file or compact JSON
    pub input: PathBuf,

    /// Print per-item totals instead of the decoded rows
    #[arg(short, long)]
    pub summary: bool,

    #[command(flatten)]
    pub fields: FieldArgs,
}

/// Record fields used when counting objects
#[derive(Args)]
pub struct FieldArgs {
    /// Field holding the item class
    #[arg(long, default_value = "name")]
    pub class_field: String,

    /// Field holding the quantity; omit with --count-rows
    #[arg(long, default_value = "qty")]
    pub qty_field: String,

    /// Count each row as one object instead of reading a quantity
    #[arg(long)]
    pub count_rows: bool,
}

impl FieldArgs {
    pub fn count_fields(&self) -> CountFields {
        CountFields {
            class: self.class_field.clone(),
            quantity: (!self.count_rows).then(|| self.qty_field.clone()),
        }
    }
}

pub fn execute(args: DecodeArgs, config: &Config) -> Result<()> {
    let format = config.format()?;
    let bytes = read_input(&args.input, config.limits.max_input_bytes)?;

    let payload = if bytes.starts_with(&PNG_SIGNATURE) {
        let container = scan(&bytes).with_context(|| format!("Failed to scan {}", args.input.display()))?;
        let located = locate(&container, &format)
            .with_context(|| format!("No blueprint payload in {}", args.input.display()))?;
        located.payload_bytes()
    } else {
        bytes
    };

    let decoded = CompactPayload::parse(&payload)
        .and_then(|p| p.decode())
        .context("Failed to decode compact payload")?;

    if args.summary {
        let catalog = config.catalog()?;
        print_summary(&summary_of(&decoded, &args.fields.count_fields(), &catalog)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
    }
    Ok(())
}

/// Per-item totals across every table of a decoded payload
pub fn summary_of(
    decoded: &DecodedPayload,
    fields: &CountFields,
    catalog: &ItemCatalog,
) -> Result<Vec<ObjectCount>> {
    let rows: Vec<_> = decoded.values().flat_map(|rows| records(rows)).collect();
    summarize(&rows, fields, catalog).context("Failed to count objects")
}

pub fn print_summary(counts: &[ObjectCount]) {
    if counts.is_empty() {
        println!("  (no objects)");
        return;
    }
    let width = counts.iter().map(|c| c.name.len()).max().unwrap_or(0);
    for count in counts {
        println!("  {:<width$}  {:>8}", count.name, count.quantity);
    }
}
