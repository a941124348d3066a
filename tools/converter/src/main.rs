//! CLI tool for converting TSA settlement files to SI2.
//!
//! # Usage
//!
//! ```bash
//! # Convert a file
//! tsa2si2 --input settlements.txt --output settlements.si2
//!
//! # Read from stdin, write to stdout
//! cat settlements.txt | tsa2si2 > settlements.si2
//!
//! # Force the settlement date and fail on any rejected line
//! tsa2si2 -i settlements.txt -o settlements.si2 --date 20240301 --strict
//! ```

use std::fs::File;
use std::io::{Read, Write, stdin, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tsa::prelude::*;

/// Convert TSA settlement instructions to the SI2 format.
///
/// Reads a TSA document from input (file or stdin) and writes SI2 rows
/// to output (file or stdout). Rejected lines are reported to stderr.
#[derive(Parser, Debug)]
#[command(name = "tsa2si2")]
#[command(version, about)]
struct Args {
    /// Input file path. If not specified, reads from stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file path. If not specified, writes to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settlement date to use instead of the one in the TSA header.
    #[arg(long, value_name = "YYYYMMDD", value_parser = parse_date)]
    date: Option<SettlementDate>,

    /// Exit with an error if any line was rejected (output is still written).
    #[arg(long)]
    strict: bool,
}

/// Parses an explicit `--date` value: exactly 8 digits.
fn parse_date(value: &str) -> Result<SettlementDate, String> {
    if value.len() != 8 {
        return Err(format!("expected 8 digits (YYYYMMDD), got '{value}'"));
    }
    value.parse().map_err(|e: ConvertError| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    // Read the whole document: the header date applies to every record
    let content = match &args.input {
        Some(path) => {
            let mut file = File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path.display()))?;
            read_document(&mut file)
                .with_context(|| format!("Failed to read input file: {}", path.display()))?
        }
        None => read_document(&mut stdin().lock()).context("Failed to read stdin")?,
    };

    // Open output destination
    let output: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout().lock()),
    };

    let conversion = convert(&content, args.date, output)?;

    // Report to stderr (so it doesn't interfere with stdout output)
    for line_error in &conversion.errors {
        eprintln!("{line_error}");
        eprintln!("  {}", line_error.line);
    }
    eprintln!(
        "Converted {} record(s), rejected {} line(s)",
        conversion.records.len(),
        conversion.errors.len()
    );

    if args.strict && !conversion.is_clean() {
        bail!("{} line(s) rejected in strict mode", conversion.errors.len());
    }

    Ok(())
}

/// Reads the whole input as UTF-8 text.
fn read_document<R: Read>(reader: &mut R) -> Result<String> {
    let mut content = String::new();
    reader.read_to_string(&mut content).context("Input is not valid UTF-8 text")?;
    Ok(content)
}

/// Converts a TSA document and writes the SI2 result to `output`.
fn convert<W: Write>(
    content: &str,
    date: Option<SettlementDate>,
    output: W,
) -> Result<Conversion> {
    let mut converter = Converter::new();
    if let Some(date) = date {
        converter = converter.with_settlement_date(date);
    }

    let conversion = converter.convert(content);
    conversion.write_to(output).context("Failed to write SI2 output")?;

    Ok(conversion)
}
