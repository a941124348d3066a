//! E2E тесты для CLI инструмента `si2_compare`.
//!
//! Файлы SI2 готовятся бинарником `tsa2si2` из фикстур `fixtures/`.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use e2e_tests::fixture;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

/// Создать команду для запуска si2_compare.
#[expect(deprecated)]
fn si2_compare() -> Command {
    Command::cargo_bin("si2_compare").unwrap()
}

/// Создать команду для запуска tsa2si2.
#[expect(deprecated)]
fn tsa2si2() -> Command {
    Command::cargo_bin("tsa2si2").unwrap()
}

/// Сконвертировать фикстуру TSA в файл SI2 внутри `dir`.
fn convert_fixture(dir: &Path, fixture_name: &str, output_name: &str) -> PathBuf {
    let output = dir.join(output_name);
    tsa2si2()
        .args(["--input", fixture(fixture_name).to_str().unwrap()])
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success();
    output
}

fn two_conversions() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().unwrap();
    let first = convert_fixture(dir.path(), "instructions_example.tsa", "first.si2");
    let second = convert_fixture(dir.path(), "instructions_example.tsa", "second.si2");
    (dir, first, second)
}

#[test]
fn test_reconversion_is_identical() {
    let (_dir, first, second) = two_conversions();

    si2_compare()
        .args(["--file1", first.to_str().unwrap(), "--file2", second.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("are identical"));
}

#[test]
fn test_match_references_detects_new_references() {
    let (_dir, first, second) = two_conversions();

    si2_compare()
        .args(["--file1", first.to_str().unwrap(), "--file2", second.to_str().unwrap()])
        .arg("--match-references")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row 1 differs:"))
        .stderr(predicate::str::contains("InstructionReference: 'EA"))
        .stderr(predicate::str::contains("Found 3 difference(s)"));
}

#[test]
fn test_same_file_with_references() {
    let (_dir, first, _) = two_conversions();

    si2_compare()
        .args(["--file1", first.to_str().unwrap(), "--file2", first.to_str().unwrap()])
        .arg("--match-references")
        .assert()
        .success();
}

#[test]
fn test_different_documents() {
    let dir = tempdir().unwrap();
    let example = convert_fixture(dir.path(), "instructions_example.tsa", "example.si2");
    let rejected = convert_fixture(dir.path(), "instructions_rejected.tsa", "rejected.si2");

    si2_compare()
        .args(["--file1", example.to_str().unwrap(), "--file2", rejected.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row 1 differs:"))
        .stderr(predicate::str::contains("SecuritiesAccount: '77046/10000' vs '847/20000'"))
        .stderr(predicate::str::contains("Row 3 exists only in"));
}

#[test]
fn test_header_only_vs_records() {
    let dir = tempdir().unwrap();
    let empty = convert_fixture(dir.path(), "header_only.tsa", "empty.si2");
    let example = convert_fixture(dir.path(), "instructions_example.tsa", "example.si2");

    si2_compare()
        .args(["--file1", empty.to_str().unwrap(), "--file2", example.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row 1 exists only in"))
        .stderr(predicate::str::contains("Found 3 difference(s)"));
}

#[test]
fn test_not_si2_file() {
    let (_dir, first, _) = two_conversions();

    si2_compare()
        .args(["--file1", fixture("instructions_example.tsa").to_str().unwrap()])
        .args(["--file2", first.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read instructions from"));
}

#[test]
fn test_missing_file() {
    let (_dir, first, _) = two_conversions();

    si2_compare()
        .args(["--file1", first.to_str().unwrap(), "--file2", "/nonexistent/file.si2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open file"));
}
