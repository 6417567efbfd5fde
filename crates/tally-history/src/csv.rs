//! CSV persistence for the calculation history.
//!
//! Format: a fixed header row followed by one row per active record. All
//! fields are numeric or registry names, so no quoting is needed. Timestamps
//! are RFC 3339.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;

use tally_ops::{Calculation, Operation};

use crate::{HistoryError, HistoryLog};

pub const CSV_HEADER: &str = "operation,operand1,operand2,result,timestamp";

/// Write the active records of `log` to `path`.
///
/// Saving an empty active view is an error, matching the interactive
/// `save` command's behavior.
pub fn save_csv(log: &HistoryLog, path: &Path) -> Result<(), HistoryError> {
    if log.active().is_empty() {
        return Err(HistoryError::Empty);
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{CSV_HEADER}")?;
    for record in log.active() {
        writeln!(
            writer,
            "{},{},{},{},{}",
            record.operation,
            record.operand_a,
            record.operand_b,
            record.result,
            record.timestamp.to_rfc3339(),
        )?;
    }
    writer.flush()?;
    debug!(
        "saved {} records to {}",
        log.active().len(),
        path.display()
    );
    Ok(())
}

/// Read a history log back from `path`.
///
/// Every row must parse; the first malformed row aborts the load with its
/// 1-based data-row number. The loaded cursor sits at the end of the log, so
/// every imported record is active.
pub fn load_csv(path: &Path, max_size: usize) -> Result<HistoryLog, HistoryError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(HistoryError::MalformedRecord {
                line: 0,
                reason: "missing header row".to_string(),
            })
        }
    };
    if header.trim() != CSV_HEADER {
        return Err(HistoryError::MalformedRecord {
            line: 0,
            reason: format!("unexpected header: {header}"),
        });
    }

    let mut records = Vec::new();
    let mut row = 0;
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        row += 1;
        records.push(parse_row(&line, row)?);
    }
    debug!("loaded {} records from {}", records.len(), path.display());
    Ok(HistoryLog::from_records(records, max_size))
}

fn parse_row(line: &str, row: usize) -> Result<Calculation, HistoryError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 5 {
        return Err(malformed(
            row,
            format!("expected 5 fields, got {}", fields.len()),
        ));
    }

    let operation =
        Operation::parse(fields[0].trim()).map_err(|e| malformed(row, e.to_string()))?;
    let operand_a = parse_number(fields[1], "operand1", row)?;
    let operand_b = parse_number(fields[2], "operand2", row)?;
    let result = parse_number(fields[3], "result", row)?;
    let timestamp = DateTime::parse_from_rfc3339(fields[4].trim())
        .map_err(|e| malformed(row, format!("bad timestamp: {e}")))?
        .with_timezone(&Utc);

    Ok(Calculation::with_timestamp(
        operation, operand_a, operand_b, result, timestamp,
    ))
}

fn parse_number(field: &str, name: &str, row: usize) -> Result<f64, HistoryError> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|_| malformed(row, format!("{name} is not a number: '{}'", field.trim())))
}

fn malformed(line: usize, reason: String) -> HistoryError {
    HistoryError::MalformedRecord { line, reason }
}
