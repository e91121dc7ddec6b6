use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use indexmap::map::Entry;

use crate::{DictCsvError, DictCsvOptions, DoubleMap, Row};

/// Read the table stored at `path`.
pub fn csv_to_dict(
    path: impl AsRef<Path>,
    options: &DictCsvOptions,
) -> Result<DoubleMap, DictCsvError> {
    let file = File::open(path.as_ref())?;
    read_dict_csv(file, options)
}

/// Read a table held in memory.
pub fn read_dict_csv_str(
    input: &str,
    options: &DictCsvOptions,
) -> Result<DoubleMap, DictCsvError> {
    read_dict_csv(input.as_bytes(), options)
}

/// Read a table from `reader`.
///
/// The first line names the columns (its leading field is the primary-key column and is
/// ignored). Every following non-blank line must have exactly one field per column plus the
/// primary key. All values are returned as text.
pub fn read_dict_csv<R: Read>(
    reader: R,
    options: &DictCsvOptions,
) -> Result<DoubleMap, DictCsvError> {
    options.validate()?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        // The header row is interpreted here, not by the csv crate.
        .has_headers(false)
        // Ragged rows get a dedicated error below instead of a generic parse failure.
        .flexible(true)
        // No quoting or escaping in this format; `"` is an ordinary character.
        .quoting(false)
        .from_reader(reader);

    let mut record = StringRecord::new();
    let has_header = csv_reader
        .read_record(&mut record)
        .map_err(|e| map_csv_error(e, 1))?;
    if !has_header {
        return Err(DictCsvError::EmptyInput);
    }
    let mut line = record_line(&record, 1);
    let columns = header_columns(&record)?;
    let expected = columns.len() + 1;

    let mut map = DoubleMap::new();
    loop {
        match csv_reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {
                line = record_line(&record, line + 1);
                if record.len() != expected {
                    return Err(DictCsvError::RaggedRow {
                        line,
                        expected,
                        found: record.len(),
                    });
                }

                let mut fields = record.iter();
                let primary_key = fields.next().unwrap_or_default().to_string();
                let row: Row = columns
                    .iter()
                    .cloned()
                    .zip(fields.map(str::to_string))
                    .collect();

                match map.entry(primary_key) {
                    Entry::Occupied(entry) => {
                        return Err(DictCsvError::DuplicatePrimaryKey {
                            line,
                            key: entry.key().clone(),
                        });
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(row);
                    }
                }
            }
            Err(e) => return Err(map_csv_error(e, line + 1)),
        }
    }

    log::debug!(
        "decoded {} rows x {} columns (delimiter {:?})",
        map.len(),
        columns.len(),
        options.delimiter_char()
    );
    Ok(map)
}

/// Column names from the header record, without the leading primary-key field.
fn header_columns(record: &StringRecord) -> Result<Vec<String>, DictCsvError> {
    let mut fields = record.iter();
    let corner = fields.next().unwrap_or_default();
    if !corner.is_empty() {
        log::warn!("ignoring non-empty primary-key header field {corner:?}");
    }

    let names: Vec<&str> = fields.collect();
    // A header of just the delimiter describes a table without columns.
    if names == [""] {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::with_capacity(names.len());
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        if name.is_empty() {
            return Err(DictCsvError::EmptyColumnName);
        }
        if !seen.insert(name) {
            return Err(DictCsvError::DuplicateColumn(name.to_string()));
        }
        columns.push(name.to_string());
    }
    Ok(columns)
}

fn record_line(record: &StringRecord, fallback: u64) -> u64 {
    record
        .position()
        .map(|p| p.line())
        .filter(|line| *line > 0)
        .unwrap_or(fallback)
}

fn map_csv_error(err: csv::Error, fallback_line: u64) -> DictCsvError {
    let reason = err.to_string();
    let line = err
        .position()
        .map(|p| p.line())
        .filter(|line| *line > 0)
        .unwrap_or(fallback_line);

    match err.into_kind() {
        csv::ErrorKind::Io(e) => DictCsvError::Io(e),
        _ => DictCsvError::Parse { line, reason },
    }
}
