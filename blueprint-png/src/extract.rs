//! Container extraction engine
//!
//! Splits a blueprint PNG into a data-only container (payload kept, pixels
//! dropped) and an image-only container (pixels kept, payload dropped). Output is
//! a pure function of the input bytes, so identical files always produce
//! identical artifacts.

use crate::{Chunk, ChunkClass, Container, ContainerError, Located, locate, scan, split_payload};
use blueprint_compact::{CompactTable, parse_table};
use blueprint_shared::BlueprintFormat;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// The two artifacts of one extraction, plus size accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// Structural + payload chunks. Not meant to be rendered.
    pub stripped_file: Vec<u8>,
    /// Structural + pixel chunks, or `None` if the source has no IDAT
    pub image_blob: Option<Vec<u8>>,
    /// Concatenated payload
    pub payload: Vec<u8>,
    pub original_size: usize,
    pub stripped_size: usize,
    /// Percentage of the original removed from the data-only file, 0-100
    pub compression_ratio: f64,
}

impl ExtractionResult {
    /// Decode the payload as a compact table (empty payload is an empty table)
    pub fn table(&self) -> Result<CompactTable, ContainerError> {
        Ok(parse_table(&self.payload)?)
    }

    /// Human-readable savings, e.g. `"97.3%"`
    pub fn savings_label(&self) -> String {
        format!("{:.1}%", self.compression_ratio)
    }
}

/// Scan `bytes` and extract both artifacts.
///
/// `original_size` is the full input length, including any bytes after IEND.
pub fn extract(bytes: &[u8], format: &BlueprintFormat) -> Result<ExtractionResult, ContainerError> {
    let container = scan(bytes)?;
    extract_sized(&container, bytes.len(), format)
}

/// Extract from an already scanned container
pub fn extract_container(
    container: &Container,
    format: &BlueprintFormat,
) -> Result<ExtractionResult, ContainerError> {
    extract_sized(container, container.encoded_len(), format)
}

fn extract_sized(
    container: &Container,
    original_size: usize,
    format: &BlueprintFormat,
) -> Result<ExtractionResult, ContainerError> {
    let located = locate(container, format)?;
    let payload = located.payload_bytes();

    let data_only = Container::from_chunks(data_only_chunks(container, &located, &payload, format))?;
    let stripped_file = data_only.to_bytes();
    let stripped_size = stripped_file.len();

    let image_blob = if located.has_image_data() {
        let image_only = Container::from_chunks(
            container
                .chunks()
                .iter()
                .filter(|c| c.class(format) != ChunkClass::Payload)
                .cloned()
                .collect(),
        )?;
        Some(image_only.to_bytes())
    } else {
        tracing::debug!("Blueprint has no image data; skipping preview");
        None
    };

    let compression_ratio = compression_ratio(original_size, stripped_size);
    tracing::debug!(
        original_size,
        stripped_size,
        compression_ratio,
        "Extracted blueprint"
    );

    Ok(ExtractionResult {
        stripped_file,
        image_blob,
        payload,
        original_size,
        stripped_size,
        compression_ratio,
    })
}

/// Structural chunks in file order, with the concatenated payload written at
/// the position of the first payload chunk.
///
/// The payload is re-split at the format's limit, or at the largest original
/// payload chunk if that is bigger, so the output never has more payload
/// chunks than the input.
fn data_only_chunks(
    container: &Container,
    located: &Located<'_>,
    payload: &[u8],
    format: &BlueprintFormat,
) -> Vec<Chunk> {
    let largest = located.payload.iter().map(|c| c.len()).max().unwrap_or(0);
    let split_format = BlueprintFormat {
        max_chunk_len: format.max_chunk_len.max(largest),
        ..*format
    };

    let mut payload_chunks = Some(split_payload(payload, &split_format));
    let mut chunks = Vec::with_capacity(located.structural.len() + 1);
    for chunk in container.chunks() {
        match chunk.class(format) {
            ChunkClass::Structural => chunks.push(chunk.clone()),
            ChunkClass::Payload => chunks.extend(payload_chunks.take().into_iter().flatten()),
            ChunkClass::Pixel => {}
        }
    }
    chunks
}

/// `(1 - stripped/original) * 100`, clamped to 0-100
fn compression_ratio(original_size: usize, stripped_size: usize) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    let ratio = (1.0 - stripped_size as f64 / original_size as f64) * 100.0;
    ratio.clamp(0.0, 100.0)
}

/// Dimensions of a decoded preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewInfo {
    pub width: u32,
    pub height: u32,
}

/// Fully decode an image-only container to check it renders.
pub fn verify_preview(bytes: &[u8]) -> Result<PreviewInfo, ContainerError> {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let mut reader = decoder
        .read_info()
        .map_err(|e| ContainerError::malformed(format!("preview header: {e}")))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ContainerError::malformed(format!("preview pixels: {e}")))?;

    Ok(PreviewInfo {
        width: info.width,
        height: info.height,
    })
}

/// File names for the two artifacts derived from `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    /// Same name and extension as the source
    pub data_file: PathBuf,
    /// `<stem><suffix>.png`
    pub preview_file: PathBuf,
}

impl ArtifactNames {
    pub fn for_source(source: &Path, format: &BlueprintFormat) -> Self {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "blueprint".to_string());

        let data_file = match source.extension() {
            Some(ext) => PathBuf::from(format!("{stem}.{}", ext.to_string_lossy())),
            None => PathBuf::from(&stem),
        };
        let preview_file = PathBuf::from(format!(
            "{stem}{}.{}",
            format.preview_suffix, format.preview_extension
        ));

        Self {
            data_file,
            preview_file,
        }
    }
}
