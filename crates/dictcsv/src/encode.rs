use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::format::{format_header, format_line};
use crate::{DictCsvError, DictCsvOptions, DoubleMap, FieldKind, Row};

/// Write `map` as a table to the file at `path`, creating or truncating it.
///
/// The whole table is rendered and validated before the file is opened, so a rejected mapping
/// leaves an existing file untouched.
pub fn dict_to_csv<V: Display>(
    map: &DoubleMap<V>,
    path: impl AsRef<Path>,
    options: &DictCsvOptions,
) -> Result<(), DictCsvError> {
    let table = render_table(map, options)?;
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    writer.write_all(table.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write `map` as a table into `writer`.
pub fn write_dict_csv<W: Write, V: Display>(
    mut writer: W,
    map: &DoubleMap<V>,
    options: &DictCsvOptions,
) -> Result<(), DictCsvError> {
    let table = render_table(map, options)?;
    writer.write_all(table.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Render `map` as a table in memory.
pub fn dict_to_csv_string<V: Display>(
    map: &DoubleMap<V>,
    options: &DictCsvOptions,
) -> Result<String, DictCsvError> {
    render_table(map, options)
}

fn render_table<V: Display>(
    map: &DoubleMap<V>,
    options: &DictCsvOptions,
) -> Result<String, DictCsvError> {
    options.validate()?;
    let delimiter = options.delimiter;

    // Column order comes from the first row; every other row must carry the same key set.
    let (_, first) = map.first().ok_or(DictCsvError::EmptyMapping)?;
    let columns: Vec<&str> = first.keys().map(String::as_str).collect();
    for column in &columns {
        if column.is_empty() {
            return Err(DictCsvError::EmptyColumnName);
        }
        check_field(FieldKind::Column, column, delimiter)?;
    }

    let mut table = format_header(&columns, delimiter);
    for (primary_key, row) in map {
        // Without columns, an empty key would become a blank line, which readers skip.
        if primary_key.is_empty() && columns.is_empty() {
            return Err(DictCsvError::EmptyPrimaryKey);
        }
        check_field(FieldKind::PrimaryKey, primary_key, delimiter)?;
        let values = aligned_values(primary_key, row, &columns)?;
        let mut texts = Vec::with_capacity(values.len());
        for value in values {
            let text = value.to_string();
            check_field(FieldKind::Value, &text, delimiter)?;
            texts.push(text);
        }
        table.push_str(&format_line(primary_key, &texts, delimiter));
    }

    log::debug!(
        "encoded {} rows x {} columns (delimiter {:?})",
        map.len(),
        columns.len(),
        options.delimiter_char()
    );
    Ok(table)
}

/// Values of `row` in header order, looked up by column name.
fn aligned_values<'a, V>(
    primary_key: &str,
    row: &'a Row<V>,
    columns: &[&str],
) -> Result<Vec<&'a V>, DictCsvError> {
    let values: Option<Vec<&V>> = columns.iter().map(|column| row.get(*column)).collect();
    match values {
        Some(values) if row.len() == columns.len() => Ok(values),
        _ => Err(DictCsvError::ColumnMismatch {
            primary_key: primary_key.to_string(),
            missing: columns
                .iter()
                .filter(|column| !row.contains_key(**column))
                .map(|column| column.to_string())
                .collect(),
            unexpected: row
                .keys()
                .filter(|key| !columns.contains(&key.as_str()))
                .cloned()
                .collect(),
        }),
    }
}

fn check_field(kind: FieldKind, text: &str, delimiter: u8) -> Result<(), DictCsvError> {
    if text
        .bytes()
        .any(|b| b == delimiter || b == b'\n' || b == b'\r')
    {
        return Err(DictCsvError::DelimiterInField {
            kind,
            text: text.to_string(),
        });
    }
    Ok(())
}
