use std::fmt;

use thiserror::Error;

/// Which part of a table a rejected piece of text was destined for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    PrimaryKey,
    Column,
    Value,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldKind::PrimaryKey => "primary key",
            FieldKind::Column => "column name",
            FieldKind::Value => "value",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum DictCsvError {
    #[error("invalid delimiter {0:?}: expected a single ASCII character other than a line break")]
    InvalidDelimiter(char),
    #[error("cannot build a table from an empty mapping")]
    EmptyMapping,
    #[error(
        "row {primary_key:?} does not match the header columns \
         (missing: {missing:?}, unexpected: {unexpected:?})"
    )]
    ColumnMismatch {
        primary_key: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    #[error("{kind} {text:?} contains the delimiter or a line break")]
    DelimiterInField { kind: FieldKind, text: String },
    #[error("a table without columns cannot hold an empty primary key")]
    EmptyPrimaryKey,
    #[error("column names must not be empty")]
    EmptyColumnName,
    #[error("csv input was empty")]
    EmptyInput,
    #[error("duplicate column name {0:?} in header")]
    DuplicateColumn(String),
    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: duplicate primary key {key:?}")]
    DuplicatePrimaryKey { line: u64, key: String },
    #[error("csv parse error at line {line}: {reason}")]
    Parse { line: u64, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
