//! Parse command - upload a file to the parsing service
//!
//! Progress frames are printed as they arrive. The read stops at the
//! save-data frame, or when the configured timeout cancels it.

use crate::config::{Config, read_input};
use crate::decode::{FieldArgs, print_summary, summary_of};
use anyhow::{Context, Result};
use blueprint_events::{CancelHandle, ParseClient, StreamError};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Arguments for the parse command
#[derive(Args)]
pub struct ParseArgs {
    /// Save file or blueprint to upload
    pub input: PathBuf,

    /// Parsing service URL (overrides [service] url)
    #[arg(long)]
    pub url: Option<String>,

    /// Print the decoded tables as JSON instead of per-item totals
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub fields: FieldArgs,
}

pub fn execute(args: ParseArgs, config: &Config) -> Result<()> {
    let url = config.service_url(args.url.as_deref())?;
    let bytes = read_input(&args.input, config.limits.max_input_bytes)?;
    let file_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let client = ParseClient::new(url)?;
    let cancel = CancelHandle::new();
    let timeout = config.service.timeout_secs;

    let decoded = runtime.block_on(async {
        let timer = (timeout > 0).then(|| {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(timeout)).await;
                tracing::warn!(timeout, "Parse timed out, cancelling");
                cancel.cancel();
            })
        });

        let result = client
            .parse(&file_name, bytes, cancel.clone(), |percent| {
                eprint!("\r  Parsing... {percent:>3}%");
                let _ = std::io::stderr().flush();
            })
            .await;
        eprintln!();

        if let Some(timer) = timer {
            timer.abort();
        }
        result
    });

    let decoded = match decoded {
        Ok(decoded) => decoded,
        Err(StreamError::Cancelled) => {
            anyhow::bail!("Parsing service did not answer within {timeout}s")
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to parse {}", args.input.display())),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
    } else {
        let catalog = config.catalog()?;
        print_summary(&summary_of(&decoded, &args.fields.count_fields(), &catalog)?);
    }
    Ok(())
}
