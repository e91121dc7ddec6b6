//! `dictcsv` converts a *double mapping* (primary key -> column name -> value) to and from a
//! delimiter-separated text table.
//!
//! The table layout is fixed:
//! - the first line holds a leading empty field followed by the column names
//! - every other line holds a primary key followed by that row's values
//!
//! ```text
//! ;X;Y;Z
//! A;1;8;4
//! B;2;6;2
//! ```
//!
//! Fields are never quoted or escaped, so keys, column names and values must not contain the
//! delimiter or a line break. The encoder rejects such text instead of writing a table that would
//! not read back. Decoded values are always text.

mod decode;
mod encode;
mod error;
mod format;
mod options;

pub use decode::{csv_to_dict, read_dict_csv, read_dict_csv_str};
pub use encode::{dict_to_csv, dict_to_csv_string, write_dict_csv};
pub use error::{DictCsvError, FieldKind};
pub use format::{dict_to_header, dict_to_line, format_header, format_line};
pub use options::DictCsvOptions;

pub use indexmap::IndexMap;

/// One table row: column name -> value, in column order.
pub type Row<V = String> = IndexMap<String, V>;

/// Primary key -> [`Row`], in row order.
pub type DoubleMap<V = String> = IndexMap<String, Row<V>>;
