//! Shared types for the blueprint codecs.
//!
//! - [`format`] - The blueprint container format contract (payload tag, split size)
//! - [`catalog`] - Class name to display name lookup table
//! - [`api`] - Types exchanged with the remote parsing service

pub mod api;
pub mod catalog;
pub mod format;

pub use api::{ObjectCount, ProgressUpdate};
pub use catalog::{CatalogEntry, ItemCatalog, ItemCategory};
pub use format::{BLUEPRINT_FORMAT, BlueprintFormat, FormatError, PNG_MAX_CHUNK_LEN};
