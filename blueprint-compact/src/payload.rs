//! Terminal payloads: one compact table, or several named ones

use crate::{CompactError, CompactTable, DecodedRow, decode};
use serde_json::Value;
use std::collections::BTreeMap;

/// Name under which a bare (unnamed) table is reported
pub const DEFAULT_TABLE: &str = "objects";

/// Decoded tables keyed by field name
pub type DecodedPayload = BTreeMap<String, Vec<DecodedRow>>;

/// A compact-encoded result as sent by the parsing service.
///
/// Either a single table, or an object whose fields are each an independent table:
///
/// ```text
/// {"materials": {"dictionary": [...], "rows": [...]},
///  "buildings": {"dictionary": [...], "rows": [...]}}
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CompactPayload {
    Table(CompactTable),
    Named(BTreeMap<String, CompactTable>),
}

impl CompactPayload {
    /// Parse from JSON bytes.
    ///
    /// Empty (or whitespace-only) input is an empty bare table, matching
    /// [`parse_table`](crate::parse_table).
    pub fn parse(bytes: &[u8]) -> Result<Self, CompactError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(CompactPayload::Table(CompactTable::default()));
        }
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    pub fn from_value(value: Value) -> Result<Self, CompactError> {
        let Value::Object(fields) = value else {
            return Err(CompactError::NotATable("payload".to_string()));
        };

        if fields.contains_key("dictionary") {
            return CompactTable::from_value(Value::Object(fields)).map(CompactPayload::Table);
        }

        fields
            .into_iter()
            .map(|(name, field)| {
                if !field.get("dictionary").is_some_and(Value::is_array) {
                    return Err(CompactError::NotATable(format!("field {name:?}")));
                }
                Ok((name, CompactTable::from_value(field)?))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(CompactPayload::Named)
    }

    /// Decode every table. A bare table is keyed by [`DEFAULT_TABLE`].
    pub fn decode(&self) -> Result<DecodedPayload, CompactError> {
        match self {
            CompactPayload::Table(table) => Ok(BTreeMap::from([(DEFAULT_TABLE.to_string(), decode(table)?)])),
            CompactPayload::Named(tables) => tables
                .iter()
                .map(|(name, table)| -> Result<_, CompactError> { Ok((name.clone(), decode(table)?)) })
                .collect(),
        }
    }
}
