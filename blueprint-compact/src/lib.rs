//! Blueprint-Compact: dictionary-compressed row decoder
//!
//! The parsing service avoids repeating field names for every object by sending a
//! *compact table*: one list of field names (the dictionary) plus rows of
//! positional values. Rows may nest: a row whose first element is itself an array
//! is a group of rows, each decoded against the same dictionary.
//!
//! # Wire Format
//!
//! ```text
//! {
//!   "dictionary": ["name", "qty"],
//!   "rows": [
//!     ["Iron", 10],                      <- flat row
//!     [["A", 1], ["B", 2]]               <- nested row (group of two)
//!   ]
//! }
//! ```
//!
//! A terminal payload may also be an object of named tables, each encoded
//! independently (see [`CompactPayload`]).
//!
//! # Usage
//!
//! ```
//! use blueprint_compact::{decode, parse_table};
//!
//! let table = parse_table(br#"{"dictionary":["name","qty"],"rows":[["Iron",10]]}"#).unwrap();
//! let rows = decode(&table).unwrap();
//! assert_eq!(rows[0].as_record().unwrap()["qty"], 10);
//! ```

mod decode;
mod error;
mod payload;
mod summary;
mod table;

pub use decode::{DecodedRow, Record, decode, decode_as, records};
pub use error::CompactError;
pub use payload::{CompactPayload, DEFAULT_TABLE, DecodedPayload};
pub use summary::{CountFields, summarize};
pub use table::{CompactTable, Row, parse_table};
