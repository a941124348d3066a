//! CLI tool for comparing two SI2 settlement instruction files.
//!
//! # Usage
//!
//! ```bash
//! # Compare two conversions of the same TSA document
//! si2_compare --file1 monday.si2 --file2 monday_rerun.si2
//!
//! # Also require identical instruction references
//! si2_compare --file1 a.si2 --file2 b.si2 --match-references
//! ```

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tsa::{prelude::*, si2::COLUMNS};

/// Index of `InstructionReference` in [`COLUMNS`].
const REFERENCE_COLUMN: usize = 8;

/// Compare settlement instructions between two SI2 files.
///
/// Rows are matched by position: instruction references are generated
/// randomly on every conversion, so they cannot serve as a key.
#[derive(Parser, Debug)]
#[command(name = "si2_compare")]
#[command(version, about)]
struct Args {
    /// First file path.
    #[arg(long)]
    file1: PathBuf,

    /// Second file path.
    #[arg(long)]
    file2: PathBuf,

    /// Treat differing InstructionReference values as a mismatch.
    #[arg(long)]
    match_references: bool,
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

    let records1 = read_file(&args.file1)?;
    let records2 = read_file(&args.file2)?;
    tracing::debug!(first = records1.len(), second = records2.len(), "read SI2 files");

    match compare_records(&records1, &records2, args.match_references) {
        CompareResult::Identical => {
            println!(
                "The instructions in '{}' and '{}' are identical.",
                args.file1.display(),
                args.file2.display()
            );
        }
        CompareResult::Different(differences) => {
            format_differences(&args, &differences);
            bail!(
                "Found {} difference(s) between '{}' and '{}'",
                differences.len(),
                args.file1.display(),
                args.file2.display()
            );
        }
    }

    Ok(())
}

/// Reads all instructions from an SI2 file.
fn read_file(path: &Path) -> Result<Vec<Si2Record>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    read_records(file)
        .with_context(|| format!("Failed to read instructions from '{}'", path.display()))
}

fn read_records<R: std::io::Read>(reader: R) -> Result<Vec<Si2Record>> {
    let mut records = Vec::new();

    for (idx, result) in Si2Reader::new(reader).enumerate() {
        let record = result.with_context(|| format!("Failed to read instruction #{}", idx + 1))?;
        records.push(record);
    }

    Ok(records)
}

/// A single difference between two instruction lists.
#[derive(Debug)]
enum Difference<'a> {
    /// Row exists only in the first file.
    OnlyInFirst { row: usize, record: &'a Si2Record },
    /// Row exists only in the second file.
    OnlyInSecond { row: usize, record: &'a Si2Record },
    /// Rows at the same position differ in the listed columns.
    Mismatch { row: usize, fields: Vec<FieldDiff> },
}

/// A column whose values differ.
#[derive(Debug, PartialEq)]
struct FieldDiff {
    column: &'static str,
    first: String,
    second: String,
}

/// Result of comparing two instruction lists.
enum CompareResult<'a> {
    Identical,
    Different(Vec<Difference<'a>>),
}

/// Compares two instruction lists row by row.
///
/// Row numbers in the result are 1-based and do not count the header.
fn compare_records<'a>(
    records1: &'a [Si2Record],
    records2: &'a [Si2Record],
    match_references: bool,
) -> CompareResult<'a> {
    let mut differences = Vec::new();

    for (idx, (r1, r2)) in records1.iter().zip(records2).enumerate() {
        let fields = field_diffs(r1, r2, match_references);
        if !fields.is_empty() {
            differences.push(Difference::Mismatch { row: idx + 1, fields });
        }
    }

    let common = records1.len().min(records2.len());
    differences.extend(
        records1[common..]
            .iter()
            .enumerate()
            .map(|(idx, record)| Difference::OnlyInFirst { row: common + idx + 1, record }),
    );
    differences.extend(
        records2[common..]
            .iter()
            .enumerate()
            .map(|(idx, record)| Difference::OnlyInSecond { row: common + idx + 1, record }),
    );

    if differences.is_empty() {
        CompareResult::Identical
    } else {
        CompareResult::Different(differences)
    }
}

fn field_diffs(r1: &Si2Record, r2: &Si2Record, match_references: bool) -> Vec<FieldDiff> {
    r1.fields()
        .into_iter()
        .zip(r2.fields())
        .enumerate()
        .filter(|(idx, _)| match_references || *idx != REFERENCE_COLUMN)
        .filter(|(_, (first, second))| first != second)
        .map(|(idx, (first, second))| FieldDiff { column: COLUMNS[idx], first, second })
        .collect()
}

/// Prints differences to stderr.
fn format_differences(args: &Args, differences: &[Difference<'_>]) {
    eprintln!("Comparing '{}' with '{}':", args.file1.display(), args.file2.display());
    eprintln!();

    for diff in differences {
        match diff {
            Difference::OnlyInFirst { row, record } => {
                eprintln!("Row {row} exists only in '{}':", args.file1.display());
                print_record(record);
            }
            Difference::OnlyInSecond { row, record } => {
                eprintln!("Row {row} exists only in '{}':", args.file2.display());
                print_record(record);
            }
            Difference::Mismatch { row, fields } => {
                eprintln!("Row {row} differs:");
                for field in fields {
                    eprintln!("  {}: '{}' vs '{}'", field.column, field.first, field.second);
                }
                eprintln!();
            }
        }
    }
}

fn print_record(record: &Si2Record) {
    eprintln!("  SecuritiesAccount: {}", record.securities_account);
    eprintln!("  Instrument: {}", record.instrument);
    eprintln!("  Quantity: {}", record.quantity);
    eprintln!();
}
