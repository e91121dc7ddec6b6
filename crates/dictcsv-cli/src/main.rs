use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dictcsv::{csv_to_dict, dict_to_csv, DictCsvOptions, DoubleMap, IndexMap, Row};
use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dictcsv")]
#[command(about = "Convert JSON double mappings to and from delimiter-separated tables.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a JSON object of objects as a table.
    Encode(EncodeArgs),
    /// Read a table and print it as a JSON object of objects.
    Decode(DecodeArgs),
    /// Write the built-in sample mapping, read it back, and print the result.
    Demo(DemoArgs),
}

#[derive(Debug, Parser)]
struct EncodeArgs {
    /// JSON input file. If omitted, reads from stdin.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Table file to create or overwrite.
    #[arg(long)]
    output: PathBuf,

    /// Field separator.
    #[arg(long, default_value_t = ';')]
    delimiter: char,
}

#[derive(Debug, Parser)]
struct DecodeArgs {
    /// Table file to read.
    #[arg(long)]
    input: PathBuf,

    /// Field separator.
    #[arg(long, default_value_t = ';')]
    delimiter: char,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Parser)]
struct DemoArgs {
    /// Where to write the sample table.
    #[arg(long, default_value = "test.csv")]
    output: PathBuf,
}

fn main() {
    init_tracing();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    // `log` records from the library are forwarded through `tracing-log`.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Encode(args) => encode(args),
        Command::Decode(args) => decode(args),
        Command::Demo(args) => demo(args),
    }
}

fn encode(args: EncodeArgs) -> Result<()> {
    let options = DictCsvOptions::with_delimiter(args.delimiter)?;

    let json = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read JSON input {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("read JSON input from stdin")?;
            buf
        }
    };
    let parsed: IndexMap<String, IndexMap<String, JsonValue>> =
        serde_json::from_str(&json).context("parse JSON input as an object of objects")?;
    let map = json_to_text(&parsed)?;

    dict_to_csv(&map, &args.output, &options)
        .with_context(|| format!("write table {}", args.output.display()))?;
    log::info!("wrote {} rows to {}", map.len(), args.output.display());
    Ok(())
}

fn decode(args: DecodeArgs) -> Result<()> {
    let options = DictCsvOptions::with_delimiter(args.delimiter)?;
    let map = read_table(&args.input, &options)?;
    print_json(&map, args.pretty)
}

fn demo(args: DemoArgs) -> Result<()> {
    let options = DictCsvOptions::default();
    let sample = sample_mapping();
    dict_to_csv(&sample, &args.output, &options)
        .with_context(|| format!("write table {}", args.output.display()))?;
    let map = read_table(&args.output, &options)?;
    print_json(&map, false)
}

fn read_table(path: &Path, options: &DictCsvOptions) -> Result<DoubleMap> {
    csv_to_dict(path, options).with_context(|| format!("read table {}", path.display()))
}

fn print_json(map: &DoubleMap, pretty: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, map)?;
    } else {
        serde_json::to_writer(&mut out, map)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Render JSON cells as table text: strings verbatim, numbers and booleans in JSON notation,
/// `null` as an empty field.
fn json_to_text(parsed: &IndexMap<String, IndexMap<String, JsonValue>>) -> Result<DoubleMap> {
    let mut map = DoubleMap::with_capacity(parsed.len());
    for (primary_key, cells) in parsed {
        let mut row = Row::with_capacity(cells.len());
        for (column, value) in cells {
            let text = match value {
                JsonValue::String(s) => s.clone(),
                JsonValue::Number(n) => n.to_string(),
                JsonValue::Bool(b) => b.to_string(),
                JsonValue::Null => String::new(),
                JsonValue::Array(_) | JsonValue::Object(_) => {
                    bail!("{primary_key}.{column}: nested JSON values cannot be written as a cell")
                }
            };
            row.insert(column.clone(), text);
        }
        map.insert(primary_key.clone(), row);
    }
    Ok(map)
}

fn sample_mapping() -> DoubleMap<u32> {
    let rows: [(&str, [u32; 3]); 4] = [
        ("A", [1, 8, 4]),
        ("B", [2, 6, 2]),
        ("C", [7, 7, 7]),
        ("D", [4, 0, 2]),
    ];
    rows.iter()
        .map(|(key, values)| {
            let row: Row<u32> = ["X", "Y", "Z"]
                .iter()
                .zip(values)
                .map(|(column, value)| (column.to_string(), *value))
                .collect();
            (key.to_string(), row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_cells_become_text() {
        let parsed: IndexMap<String, IndexMap<String, JsonValue>> = serde_json::from_str(
            r#"{"A": {"s": "hi", "n": 1.5, "i": 3, "b": true, "z": null}}"#,
        )
        .unwrap();
        let map = json_to_text(&parsed).unwrap();
        let row = &map["A"];
        let cells: Vec<(&str, &str)> = row.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            cells,
            vec![("s", "hi"), ("n", "1.5"), ("i", "3"), ("b", "true"), ("z", "")]
        );
    }

    #[test]
    fn nested_json_is_rejected() {
        let parsed: IndexMap<String, IndexMap<String, JsonValue>> =
            serde_json::from_str(r#"{"A": {"x": [1, 2]}}"#).unwrap();
        let err = json_to_text(&parsed).unwrap_err();
        assert!(err.to_string().contains("A.x"), "{err}");
    }

    #[test]
    fn sample_mapping_matches_demo_table() {
        let text = dictcsv::dict_to_csv_string(&sample_mapping(), &DictCsvOptions::default())
            .unwrap();
        assert_eq!(text, ";X;Y;Z\nA;1;8;4\nB;2;6;2\nC;7;7;7\nD;4;0;2\n");
    }
}
