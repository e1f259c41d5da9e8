//! Types exchanged with the remote blueprint parsing service.

use crate::catalog::ItemCategory;
use serde::{Deserialize, Serialize};

/// Event name carrying a parse progress percentage.
pub const EVENT_PROGRESS: &str = "progress";

/// Event name carrying the final, compact-encoded parse result.
pub const EVENT_SAVE_DATA: &str = "save-data";

/// Event name used for data lines that were not preceded by an `event:` line.
pub const DEFAULT_EVENT: &str = "message";

/// Body of a `progress` frame: `{"progress":42}` or a bare `42`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgressUpdate {
    Object { progress: f64 },
    Bare(f64),
}

impl ProgressUpdate {
    /// Rounded percentage, clamped to 100. `None` for negative or non-finite values.
    pub fn percent(&self) -> Option<u8> {
        let (Self::Object { progress: value } | Self::Bare(value)) = *self;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        Some(value.round().min(100.0) as u8)
    }
}

/// Aggregated count of one kind of game object in a parsed blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCount {
    /// Internal class name as reported by the parser.
    pub class: String,
    /// Display name from the item catalog (falls back to `class`).
    pub name: String,
    pub category: ItemCategory,
    /// Total quantity across the blueprint.
    pub quantity: u64,
}
