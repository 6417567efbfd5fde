//! Calculation history with undo/redo.
//!
//! The log is an append-only vector of [`Calculation`] records plus a cursor
//! in `[0, len]`. Records below the cursor are the active history; records at
//! or above it are redoable. Recording a new calculation truncates the redo
//! tail first, so the log always reads as a single linear timeline.

use thiserror::Error;

use tally_ops::Calculation;

mod csv;

pub use csv::{load_csv, save_csv, CSV_HEADER};

/// Default bound on the number of records kept in memory.
pub const DEFAULT_MAX_SIZE: usize = 100;

/// Errors produced by history bookkeeping and persistence.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("no history to save")]
    Empty,
    #[error("malformed record on row {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered calculation log with an undo/redo cursor.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    records: Vec<Calculation>,
    cursor: usize,
    max_size: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_SIZE)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            records: Vec::new(),
            cursor: 0,
            max_size: max_size.max(1),
        }
    }

    /// Rebuild a log from already-parsed records; everything is active.
    pub fn from_records(mut records: Vec<Calculation>, max_size: usize) -> Self {
        let max_size = max_size.max(1);
        if records.len() > max_size {
            let excess = records.len() - max_size;
            records.drain(..excess);
        }
        let cursor = records.len();
        Self {
            records,
            cursor,
            max_size,
        }
    }

    /// Append a record at the cursor, discarding any redoable tail. The
    /// oldest record is evicted once the log exceeds its bound.
    pub fn record(&mut self, calculation: Calculation) {
        self.records.truncate(self.cursor);
        self.records.push(calculation);
        self.cursor = self.records.len();
        if self.records.len() > self.max_size {
            self.records.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step the cursor back one record and return the record now excluded
    /// from the active view.
    pub fn undo(&mut self) -> Result<&Calculation, HistoryError> {
        if self.cursor == 0 {
            return Err(HistoryError::NothingToUndo);
        }
        self.cursor -= 1;
        Ok(&self.records[self.cursor])
    }

    /// Step the cursor forward one record and return the record brought back
    /// into the active view.
    pub fn redo(&mut self) -> Result<&Calculation, HistoryError> {
        if self.cursor == self.records.len() {
            return Err(HistoryError::NothingToRedo);
        }
        let record = &self.records[self.cursor];
        self.cursor += 1;
        Ok(record)
    }

    /// Records below the cursor, oldest first.
    pub fn active(&self) -> &[Calculation] {
        &self.records[..self.cursor]
    }

    /// The most recent active record, if any.
    pub fn last(&self) -> Option<&Calculation> {
        self.active().last()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total records in the log, including the redoable tail.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_ops::Operation;

    fn calc(a: f64, b: f64) -> Calculation {
        Calculation::new(Operation::Add, a, b, a + b)
    }

    #[test]
    fn initial_state_is_empty() {
        let log = HistoryLog::new();
        assert_eq!(log.cursor(), 0);
        assert!(log.active().is_empty());
    }

    #[test]
    fn undo_at_origin_fails() {
        let mut log = HistoryLog::new();
        assert!(matches!(log.undo(), Err(HistoryError::NothingToUndo)));
    }

    #[test]
    fn redo_at_tip_fails() {
        let mut log = HistoryLog::new();
        log.record(calc(1.0, 2.0));
        assert!(matches!(log.redo(), Err(HistoryError::NothingToRedo)));
    }

    #[test]
    fn eviction_keeps_cursor_in_bounds() {
        let mut log = HistoryLog::with_max_size(2);
        log.record(calc(1.0, 1.0));
        log.record(calc(2.0, 2.0));
        log.record(calc(3.0, 3.0));
        assert_eq!(log.len(), 2);
        assert_eq!(log.cursor(), 2);
        assert_eq!(log.active()[0].operand_a, 2.0);
    }

    #[test]
    fn from_records_trims_to_bound() {
        let records = vec![calc(1.0, 1.0), calc(2.0, 2.0), calc(3.0, 3.0)];
        let log = HistoryLog::from_records(records, 2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.cursor(), 2);
        assert_eq!(log.active()[0].operand_a, 2.0);
    }
}
