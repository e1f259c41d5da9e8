use thiserror::Error;

/// Errors that can occur while parsing or decoding compact tables
#[derive(Error, Debug)]
pub enum CompactError {
    /// A row's shape or value count does not match the dictionary.
    /// Rows are never truncated or padded to fit.
    #[error("schema mismatch at {path}: expected {expected} values, found {found}")]
    SchemaMismatch {
        path: String,
        expected: usize,
        found: usize,
    },

    /// Something that should be a row is not an array
    #[error("schema mismatch at {path}: row is not an array")]
    NotARow { path: String },

    /// A payload (or one of its named fields) is not a dictionary/rows object
    #[error("{0} is not a compact table")]
    NotATable(String),

    #[error("duplicate field {0:?} in dictionary")]
    DuplicateField(String),

    /// A decoded record lacks a field, or the field has the wrong type
    #[error("record {index}: field {field:?} {reason}")]
    Field {
        index: usize,
        field: String,
        reason: &'static str,
    },

    #[error("invalid compact JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CompactError {
    /// True for errors raised because data did not fit the dictionary.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::SchemaMismatch { .. } | Self::NotARow { .. })
    }
}
