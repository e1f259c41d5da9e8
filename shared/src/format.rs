//! Blueprint container format contract.
//!
//! This module defines the `BlueprintFormat` struct which is the single source of truth
//! for the constants that make a PNG a blueprint file: the reserved payload chunk tag,
//! the maximum size of one payload chunk, and the naming of derived artifacts.
//!
//! These values are part of the on-disk format. Files written with the default
//! format must stay readable, so the defaults never change.
//!
//! # Example
//!
//! ```
//! use blueprint_shared::BLUEPRINT_FORMAT;
//!
//! assert_eq!(&BLUEPRINT_FORMAT.payload_tag, b"blPt");
//! assert_eq!(BLUEPRINT_FORMAT.max_chunk_len, 1024 * 1024);
//! assert_eq!(BLUEPRINT_FORMAT.preview_extension, "png");
//! ```

use serde::{Deserialize, Serialize};

/// Largest data length PNG allows for a single chunk (2^31 - 1).
pub const PNG_MAX_CHUNK_LEN: usize = 0x7FFF_FFFF;

/// Blueprint container format specification.
///
/// Passed explicitly into the container codec instead of being read from
/// global state, so tests and tools can use alternate tags side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintFormat {
    /// Chunk tag carrying the embedded blueprint payload (4 ASCII letters)
    #[serde(with = "tag_string")]
    pub payload_tag: [u8; 4],

    /// Maximum data length of one payload chunk; larger payloads are split
    pub max_chunk_len: usize,

    /// Suffix appended to the source stem for the image-only artifact
    #[serde(skip, default = "default_preview_suffix")]
    pub preview_suffix: &'static str,

    /// Extension of the image-only artifact (always a PNG)
    #[serde(skip, default = "default_preview_extension")]
    pub preview_extension: &'static str,
}

fn default_preview_suffix() -> &'static str {
    BLUEPRINT_FORMAT.preview_suffix
}

fn default_preview_extension() -> &'static str {
    BLUEPRINT_FORMAT.preview_extension
}

impl BlueprintFormat {
    /// Create a new format specification.
    pub const fn new(payload_tag: [u8; 4], max_chunk_len: usize) -> Self {
        Self {
            payload_tag,
            max_chunk_len,
            preview_suffix: "-preview",
            preview_extension: "png",
        }
    }

    /// Payload tag as a string (lossless, tags are ASCII letters)
    pub fn payload_tag_str(&self) -> String {
        String::from_utf8_lossy(&self.payload_tag).into_owned()
    }

    /// Check the tag is an ancillary chunk name (four ASCII letters, lowercase
    /// first) that the image does not already use, and that the split size fits
    /// in a PNG chunk.
    pub fn validate(&self) -> Result<(), FormatError> {
        if !self.payload_tag.iter().all(u8::is_ascii_alphabetic) {
            return Err(FormatError::InvalidTag(self.payload_tag_str()));
        }
        // Critical chunks (uppercase first letter) and tRNS belong to the image itself
        if self.payload_tag[0].is_ascii_uppercase() || &self.payload_tag == b"tRNS" {
            return Err(FormatError::ReservedTag(self.payload_tag_str()));
        }
        if self.max_chunk_len == 0 || self.max_chunk_len > PNG_MAX_CHUNK_LEN {
            return Err(FormatError::InvalidChunkLimit(self.max_chunk_len));
        }
        Ok(())
    }
}

impl Default for BlueprintFormat {
    fn default() -> Self {
        BLUEPRINT_FORMAT
    }
}

/// Standard blueprint format.
///
/// - Payload tag: `blPt` (ancillary, private, safe-to-copy)
/// - Payload split size: 1 MiB per chunk
/// - Preview artifact: `<stem>-preview.png`
pub const BLUEPRINT_FORMAT: BlueprintFormat = BlueprintFormat::new(*b"blPt", 1024 * 1024);

/// Errors for a user-supplied format override.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("payload tag {0:?} must be four ASCII letters")]
    InvalidTag(String),

    #[error("payload tag {0:?} is reserved for image data; use an ancillary tag")]
    ReservedTag(String),

    #[error("payload chunk limit {0} must be between 1 and 2^31-1 bytes")]
    InvalidChunkLimit(usize),
}

mod tag_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(tag: &[u8; 4], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(tag))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 4], D::Error> {
        let s = String::deserialize(deserializer)?;
        s.as_bytes()
            .try_into()
            .map_err(|_| D::Error::custom(format!("chunk tag {s:?} must be exactly 4 bytes")))
    }
}
