//! E2E тесты для CLI инструмента `tsa2si2`.
//!
//! Конвертируем фикстуры из `tests/e2e/fixtures` через файлы и через
//! stdin/stdout, проверяем отчёт об отброшенных строках и коды выхода.

use std::fs;

use assert_cmd::Command;
use e2e_tests::fixture;
use predicates::prelude::*;
use tempfile::tempdir;

const HEADER: &str = "InstructingParty;SettlementParty;SecuritiesAccount;Instrument;InstrumentIdentifierType;CSDOfCounterparty;SettlementCounterparty;SecuritiesAccountOfCounterparty;InstructionReference;Instrument(MovementOfSecurities);Quantity;QuantityType;TransactionType;SettlementMethod;TradeDate;IntendedSettlementDate;PaymentType";

/// Создать команду для запуска tsa2si2.
///
/// `cargo_bin` deprecated из-за edge case с custom build directories,
/// но это единственный способ для кросс-крейтовых бинарников.
#[expect(deprecated)]
fn tsa2si2() -> Command {
    Command::cargo_bin("tsa2si2").unwrap()
}

/// Разбить строку SI2 на поля, заменив случайный `InstructionReference`.
fn masked_fields(row: &str) -> Vec<String> {
    let mut fields: Vec<String> = row.split(';').map(str::to_string).collect();
    assert_eq!(fields.len(), 17, "row: {row}");
    assert!(fields[8].starts_with("EA") && fields[8].len() == 16, "reference: {}", fields[8]);
    fields[8] = "EA*".to_string();
    fields
}

// ============================================================================
// Конвертация
// ============================================================================

#[test]
fn test_file_to_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("output.si2");

    tsa2si2()
        .args(["--input", fixture("instructions_example.tsa").to_str().unwrap()])
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Converted 3 record(s), rejected 0 line(s)"));

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], HEADER);
    assert!(content.ends_with('\n'));

    assert_eq!(
        masked_fields(lines[1]).join(";"),
        "7046;7046;77046/10000;5921;LOCAL_CODE;CVSA;7046;7046/10018;EA*;\
         DELIVER;27.0;;TRAD;BATCH_SETTLEMENT;20240301;20240301;NOTHING"
    );
    assert_eq!(
        masked_fields(lines[2]).join(";"),
        "847;847;847/20000;125;LOCAL_CODE;CVSA;847;847/30000;EA*;\
         DELIVER;1500.25;;TRAD;RTGS;20240301;20240301;NOTHING"
    );
    assert_eq!(
        masked_fields(lines[3]).join(";"),
        "12;12;712/500;777;LOCAL_CODE;CVSA;12;12/600;EA*;\
         DELIVER;100.0;;TRAD;BATCH_SETTLEMENT;20240301;20240301;NOTHING"
    );
}

#[test]
fn test_stdin_to_stdout() {
    let input = fs::read_to_string(fixture("instructions_example.tsa")).unwrap();

    let assert = tsa2si2().write_stdin(input).assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], HEADER);
    assert!(lines[1].starts_with("7046;7046;77046/10000;"));
}

#[test]
fn test_date_override() {
    let assert = tsa2si2()
        .args(["-i", fixture("instructions_example.tsa").to_str().unwrap()])
        .args(["--date", "20251231"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for row in stdout.lines().skip(1) {
        assert!(row.ends_with(";20251231;20251231;NOTHING"), "row: {row}");
    }
}

#[test]
fn test_header_only_document() {
    tsa2si2()
        .args(["-i", fixture("header_only.tsa").to_str().unwrap()])
        .assert()
        .success()
        .stdout(format!("{HEADER}\n"))
        .stderr(predicate::str::contains("Converted 0 record(s), rejected 0 line(s)"));
}

#[test]
fn test_distinct_references() {
    let assert =
        tsa2si2().args(["-i", fixture("instructions_example.tsa").to_str().unwrap()]).assert();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let mut references: Vec<&str> =
        stdout.lines().skip(1).map(|row| row.split(';').nth(8).unwrap()).collect();
    references.sort_unstable();
    references.dedup();
    assert_eq!(references.len(), 3);
}

// ============================================================================
// Отброшенные строки
// ============================================================================

#[test]
fn test_rejected_lines_are_reported() {
    let assert = tsa2si2()
        .args(["-i", fixture("instructions_rejected.tsa").to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("line 3: Malformed record"))
        .stderr(predicate::str::contains("  1'D'E'0847'000020000"))
        .stderr(predicate::str::contains("line 4: Invalid participant code '08A7'"))
        .stderr(predicate::str::contains("line 5: Invalid quantity"))
        .stderr(predicate::str::contains("Converted 2 record(s), rejected 3 line(s)"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("847;847;847/20000;"));
    assert!(lines[2].starts_with("310;310;310/42;99;"));
    assert!(lines[2].contains(";5.0;;TRAD;RTGS;20240415;20240415;"));
}

#[test]
fn test_strict_fails_but_writes_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("output.si2");

    tsa2si2()
        .args(["-i", fixture("instructions_rejected.tsa").to_str().unwrap()])
        .args(["-o", output.to_str().unwrap()])
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: 3 line(s) rejected in strict mode"));

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn test_strict_passes_on_clean_input() {
    tsa2si2()
        .args(["-i", fixture("instructions_example.tsa").to_str().unwrap()])
        .arg("--strict")
        .assert()
        .success();
}

// ============================================================================
// Ошибки аргументов и ввода-вывода
// ============================================================================

#[test]
fn test_missing_input_file() {
    let assert = tsa2si2()
        .args(["-i", "/nonexistent/settlements.tsa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Failed to open input file"));

    // Сообщение об ошибке выводится ровно один раз
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert_eq!(stderr.matches("Failed to open input file").count(), 1, "stderr: {stderr}");
}

#[test]
fn test_invalid_date_argument() {
    tsa2si2()
        .args(["-i", fixture("instructions_example.tsa").to_str().unwrap()])
        .args(["--date", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYYMMDD"));
}

#[test]
fn test_invalid_utf8_input() {
    tsa2si2()
        .write_stdin(vec![b'1', 0xff, 0xfe, b'\n'])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read stdin"));
}

#[test]
fn test_help() {
    tsa2si2().arg("--help").assert().success().stdout(predicate::str::contains("--strict"));
}
