use std::fs;

use tempfile::TempDir;

use tally_history::{load_csv, save_csv, HistoryError, HistoryLog, CSV_HEADER};
use tally_ops::{evaluate, Calculation, Operation};

fn calc(op: Operation, a: f64, b: f64) -> Calculation {
    Calculation::new(op, a, b, evaluate(op, a, b).unwrap())
}

fn sample_log() -> HistoryLog {
    let mut log = HistoryLog::new();
    log.record(calc(Operation::Add, 2.0, 3.0));
    log.record(calc(Operation::Divide, 10.0, 4.0));
    log.record(calc(Operation::Percent, 25.0, 200.0));
    log
}

#[test]
fn save_writes_header_and_one_row_per_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    save_csv(&sample_log(), &path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("add,2,3,5,"));
    assert!(lines[2].starts_with("divide,10,4,2.5,"));
}

#[test]
fn round_trip_reproduces_active_records_exactly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    let log = sample_log();
    save_csv(&log, &path).unwrap();

    let loaded = load_csv(&path, log.max_size()).unwrap();
    assert_eq!(loaded.active(), log.active());
    assert_eq!(loaded.cursor(), loaded.len());
}

#[test]
fn export_covers_only_the_active_view() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    let mut log = sample_log();
    log.undo().unwrap();
    save_csv(&log, &path).unwrap();

    let loaded = load_csv(&path, log.max_size()).unwrap();
    assert_eq!(loaded.active().len(), 2);
    assert_eq!(loaded.active(), log.active());
}

#[test]
fn saving_an_empty_log_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    let log = HistoryLog::new();
    assert!(matches!(save_csv(&log, &path), Err(HistoryError::Empty)));
}

#[test]
fn loading_a_missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.csv");
    assert!(matches!(load_csv(&path, 100), Err(HistoryError::Io(_))));
}

#[test]
fn wrong_column_count_reports_the_row() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    fs::write(&path, format!("{CSV_HEADER}\nadd,2,3,5\n")).unwrap();

    match load_csv(&path, 100) {
        Err(HistoryError::MalformedRecord { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn non_numeric_operand_reports_the_row() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    fs::write(
        &path,
        format!("{CSV_HEADER}\nadd,2,3,5,2024-01-01T00:00:00+00:00\nadd,x,3,5,2024-01-01T00:00:00+00:00\n"),
    )
    .unwrap();

    match load_csv(&path, 100) {
        Err(HistoryError::MalformedRecord { line, reason }) => {
            assert_eq!(line, 2);
            assert!(reason.contains("operand1"));
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn unknown_operation_in_a_row_is_malformed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    fs::write(
        &path,
        format!("{CSV_HEADER}\ncube,2,3,8,2024-01-01T00:00:00+00:00\n"),
    )
    .unwrap();

    assert!(matches!(
        load_csv(&path, 100),
        Err(HistoryError::MalformedRecord { line: 1, .. })
    ));
}

#[test]
fn unexpected_header_is_malformed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    fs::write(&path, "op,a,b,r,t\nadd,2,3,5,2024-01-01T00:00:00+00:00\n").unwrap();

    assert!(matches!(
        load_csv(&path, 100),
        Err(HistoryError::MalformedRecord { line: 0, .. })
    ));
}
