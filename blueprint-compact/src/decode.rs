//! Compact row decoder
//!
//! Zips each row's positional values against the dictionary. Values are passed
//! through untouched; the decoder only re-keys.

use crate::{CompactError, CompactTable, Row};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A decoded row: field name to value
pub type Record = Map<String, Value>;

/// Result of decoding one [`Row`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedRow {
    Record(Record),
    Nested(Vec<DecodedRow>),
}

impl DecodedRow {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            DecodedRow::Record(record) => Some(record),
            DecodedRow::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&[DecodedRow]> {
        match self {
            DecodedRow::Record(_) => None,
            DecodedRow::Nested(rows) => Some(rows),
        }
    }

    fn collect_records<'a>(&'a self, out: &mut Vec<&'a Record>) {
        match self {
            DecodedRow::Record(record) => out.push(record),
            DecodedRow::Nested(rows) => rows.iter().for_each(|row| row.collect_records(out)),
        }
    }
}

/// Decode every row of `table`.
///
/// # Errors
/// [`CompactError::SchemaMismatch`] if any flat row does not have exactly one
/// value per dictionary field.
pub fn decode(table: &CompactTable) -> Result<Vec<DecodedRow>, CompactError> {
    let dictionary = table.dictionary();
    let decoded = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| decode_row(dictionary, row, &format!("rows[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        fields = dictionary.len(),
        rows = decoded.len(),
        "Decoded compact table"
    );
    Ok(decoded)
}

fn decode_row(dictionary: &[String], row: &Row, path: &str) -> Result<DecodedRow, CompactError> {
    match row {
        Row::Values(values) => {
            if values.len() != dictionary.len() {
                return Err(CompactError::SchemaMismatch {
                    path: path.to_string(),
                    expected: dictionary.len(),
                    found: values.len(),
                });
            }
            let record = dictionary
                .iter()
                .cloned()
                .zip(values.iter().cloned())
                .collect::<Record>();
            Ok(DecodedRow::Record(record))
        }
        Row::Nested(rows) => rows
            .iter()
            .enumerate()
            .map(|(i, child)| decode_row(dictionary, child, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>, _>>()
            .map(DecodedRow::Nested),
    }
}

/// All records in `rows`, depth-first, nested groups flattened.
pub fn records(rows: &[DecodedRow]) -> Vec<&Record> {
    let mut out = Vec::new();
    for row in rows {
        row.collect_records(&mut out);
    }
    out
}

/// Decode `table` and deserialize each record (nested groups flattened) into `T`.
pub fn decode_as<T: DeserializeOwned>(table: &CompactTable) -> Result<Vec<T>, CompactError> {
    let rows = decode(table)?;
    records(&rows)
        .into_iter()
        .map(|record| T::deserialize(Value::Object(record.clone())).map_err(CompactError::from))
        .collect()
}
