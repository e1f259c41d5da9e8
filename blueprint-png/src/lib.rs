//! Blueprint-PNG: blueprint payloads inside PNG files
//!
//! A blueprint file is an ordinary PNG with one extra ancillary chunk type that
//! carries the serialized blueprint. Image viewers skip the unknown chunk and show
//! the preview; tooling that knows the tag can pull the blueprint back out.
//!
//! This crate is a pure codec over in-memory buffers. It never touches the
//! filesystem and holds no global state, so every function is safe to call
//! from any number of threads at once.
//!
//! # Container Layout
//!
//! ```text
//! Signature (8 bytes): 89 50 4E 47 0D 0A 1A 0A
//!
//! Chunk (repeats, first is IHDR, last is IEND):
//!   0x00: length u32 BE       - data length only
//!   0x04: type [u8; 4]        - ASCII letters
//!   0x08: data [u8; length]
//!   ....: crc u32 BE          - CRC-32 over type ++ data
//! ```
//!
//! # Chunk Classes
//!
//! | Class      | Tags                         | Data-only | Image-only |
//! |------------|------------------------------|-----------|------------|
//! | Payload    | `blPt` (format's tag)        | kept      | dropped    |
//! | Pixel      | `IDAT`, `PLTE`, `tRNS`       | dropped   | kept       |
//! | Structural | everything else              | kept      | kept       |
//!
//! Payloads larger than the format's split size are written as several
//! consecutive payload chunks and concatenated in file order when read.
//!
//! # Usage
//!
//! ```no_run
//! use blueprint_png::{extract, ContainerError};
//! use blueprint_shared::BLUEPRINT_FORMAT;
//!
//! let bytes = std::fs::read("factory.png").unwrap();
//! match extract(&bytes, &BLUEPRINT_FORMAT) {
//!     Ok(result) => println!("saved {:.1}%", result.compression_ratio),
//!     Err(ContainerError::NotABlueprintContainer) => println!("plain image"),
//!     Err(e) => eprintln!("corrupt file: {e}"),
//! }
//! ```

mod chunk;
mod container;
mod embed;
mod error;
mod extract;
mod locate;
mod scan;

pub use chunk::{Chunk, ChunkClass, ChunkType, PNG_SIGNATURE, chunk_crc};
pub use container::{Container, ImageHeader};
pub use embed::{combine, embed, embed_bytes, split_payload};
pub use error::ContainerError;
pub use extract::{ArtifactNames, ExtractionResult, PreviewInfo, extract, extract_container, verify_preview};
pub use locate::{Located, locate};
pub use scan::scan;
