//! Compact table structure and parsing

use crate::CompactError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use hashbrown::HashSet;

/// One row of a compact table.
///
/// The shape is decided by the first element: if it is an array the row is a
/// group of nested rows, otherwise it is a list of positional values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Row {
    Values(Vec<Value>),
    Nested(Vec<Row>),
}

impl Row {
    /// Classify a JSON value as a row. `path` is used for error messages.
    pub fn from_value(value: Value, path: &str) -> Result<Self, CompactError> {
        let Value::Array(items) = value else {
            return Err(CompactError::NotARow {
                path: path.to_string(),
            });
        };

        match items.first() {
            Some(Value::Array(_)) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| Row::from_value(item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Row::Nested),
            _ => Ok(Row::Values(items)),
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Row::Nested(_))
    }
}

/// Dictionary plus rows of positional values.
///
/// Field names in the dictionary are unique; this is checked on construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTable")]
pub struct CompactTable {
    dictionary: Vec<String>,
    rows: Vec<Row>,
}

/// Unvalidated wire form of a [`CompactTable`]
#[derive(Deserialize)]
struct RawTable {
    dictionary: Vec<String>,
    #[serde(default)]
    rows: Vec<Value>,
}

impl TryFrom<RawTable> for CompactTable {
    type Error = CompactError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        let rows = raw
            .rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| Row::from_value(row, &format!("rows[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(raw.dictionary, rows)
    }
}

impl CompactTable {
    /// Create a table, rejecting duplicate field names.
    pub fn new(dictionary: Vec<String>, rows: Vec<Row>) -> Result<Self, CompactError> {
        {
            let mut seen = HashSet::with_capacity(dictionary.len());
            for name in &dictionary {
                if !seen.insert(name.as_str()) {
                    return Err(CompactError::DuplicateField(name.clone()));
                }
            }
        }
        Ok(Self { dictionary, rows })
    }

    /// Parse a table from a JSON value
    pub fn from_value(value: Value) -> Result<Self, CompactError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn dictionary(&self) -> &[String] {
        &self.dictionary
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize back to the compact JSON form
    pub fn to_json(&self) -> Result<String, CompactError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parse a compact table from raw bytes.
///
/// Empty (or whitespace-only) input is a valid, empty table. This is what a
/// zero-length payload chunk decodes to.
pub fn parse_table(bytes: &[u8]) -> Result<CompactTable, CompactError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(CompactTable::default());
    }
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_shape_flat() {
        let row = Row::from_value(json!(["Iron", 10]), "rows[0]").unwrap();
        assert_eq!(row, Row::Values(vec![json!("Iron"), json!(10)]));
    }

    #[test]
    fn test_row_shape_nested() {
        let row = Row::from_value(json!([["A", 1], ["B", 2]]), "rows[0]").unwrap();
        assert!(row.is_nested());
    }

    #[test]
    fn test_row_shape_doubly_nested() {
        let row = Row::from_value(json!([[["A", 1]], ["B", 2]]), "rows[0]").unwrap();
        let Row::Nested(children) = row else {
            panic!("expected nested row");
        };
        assert!(children[0].is_nested());
        assert!(!children[1].is_nested());
    }

    #[test]
    fn test_row_not_an_array() {
        let err = Row::from_value(json!({"name": "Iron"}), "rows[3]").unwrap_err();
        assert!(matches!(err, CompactError::NotARow { ref path } if path == "rows[3]"));
    }

    #[test]
    fn test_nested_row_with_scalar_member() {
        let err = Row::from_value(json!([["A", 1], "B"]), "rows[0]").unwrap_err();
        assert!(matches!(err, CompactError::NotARow { ref path } if path == "rows[0][1]"));
    }

    #[test]
    fn test_empty_row_is_flat() {
        let row = Row::from_value(json!([]), "rows[0]").unwrap();
        assert_eq!(row, Row::Values(vec![]));
    }

    #[test]
    fn test_duplicate_dictionary_rejected() {
        let err = parse_table(br#"{"dictionary":["a","a"],"rows":[]}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate field"));
    }

    #[test]
    fn test_empty_bytes_is_empty_table() {
        assert_eq!(parse_table(b"").unwrap(), CompactTable::default());
        assert_eq!(parse_table(b" \n").unwrap(), CompactTable::default());
    }

    #[test]
    fn test_serialize_preserves_shape() {
        let input = json!({"dictionary": ["name", "qty"], "rows": [["Iron", 10], [["A", 1]]]});
        let table = CompactTable::from_value(input.clone()).unwrap();
        let output: Value = serde_json::from_str(&table.to_json().unwrap()).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_missing_rows_defaults_to_empty() {
        let table = parse_table(br#"{"dictionary":["name"]}"#).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.dictionary(), ["name".to_string()]);
    }
}
