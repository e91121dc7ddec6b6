//! Single-line formatters for the table layout.
//!
//! These do no validation: text containing the delimiter is written as-is. The encoder checks
//! fields before calling into here.

use std::fmt::{Display, Write as _};

use crate::Row;

/// Header line for `columns`: a leading delimiter (the primary-key column has no name), the
/// column names joined by the delimiter, and a trailing `\n`.
pub fn format_header<I>(columns: I, delimiter: u8) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let sep = char::from(delimiter);
    let mut line = String::new();
    line.push(sep);
    for (idx, column) in columns.into_iter().enumerate() {
        if idx > 0 {
            line.push(sep);
        }
        line.push_str(column.as_ref());
    }
    line.push('\n');
    line
}

/// Header line built from the keys of `row`, in iteration order.
pub fn dict_to_header<V>(row: &Row<V>, delimiter: u8) -> String {
    format_header(row.keys(), delimiter)
}

/// Data line: `primary_key`, then each value rendered with [`Display`] and preceded by the
/// delimiter, then `\n`.
pub fn format_line<I>(primary_key: &str, values: I, delimiter: u8) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let sep = char::from(delimiter);
    let mut line = String::from(primary_key);
    for value in values {
        line.push(sep);
        // Writing into a `String` cannot fail.
        let _ = write!(line, "{value}");
    }
    line.push('\n');
    line
}

/// Data line for `row`, using the row's own iteration order.
pub fn dict_to_line<V: Display>(row: &Row<V>, primary_key: &str, delimiter: u8) -> String {
    format_line(primary_key, row.values(), delimiter)
}
