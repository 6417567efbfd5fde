//! Host-agnostic calculator session.
//!
//! [`CalcSession`] owns the history log and the configured precision and
//! input limits. Hosts (the CLI, tests, embedders) drive it with parsed
//! operations and operands; the session validates, evaluates, rounds,
//! records, and then invokes its post-commit hooks in registration order.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use tally_history::{load_csv, save_csv};

pub use tally_history::{HistoryError, HistoryLog, DEFAULT_MAX_SIZE};
pub use tally_ops::{evaluate, evaluate_slice, CalcError, Calculation, Operation};

/// Default number of decimal places kept in results.
pub const DEFAULT_PRECISION: u32 = 2;

/// Default bound on operand magnitude.
pub const DEFAULT_MAX_INPUT_VALUE: f64 = 1_000_000.0;

/// Synchronous post-commit hook. Invoked with the log as of the commit and
/// the record that was just appended.
pub type CommitHook = Box<dyn Fn(&HistoryLog, &Calculation)>;

pub struct CalcSession {
    history: HistoryLog,
    precision: u32,
    max_input_value: f64,
    hooks: Vec<CommitHook>,
}

impl Default for CalcSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CalcSession {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_PRECISION, DEFAULT_MAX_INPUT_VALUE, DEFAULT_MAX_SIZE)
    }

    pub fn with_settings(precision: u32, max_input_value: f64, max_history: usize) -> Self {
        Self {
            history: HistoryLog::with_max_size(max_history),
            precision,
            max_input_value,
            hooks: Vec::new(),
        }
    }

    /// Register a post-commit hook. Hooks run synchronously after each
    /// successful calculation, in registration order.
    pub fn add_hook(&mut self, hook: CommitHook) {
        self.hooks.push(hook);
    }

    /// Validate, evaluate, round, and record one calculation.
    pub fn perform(&mut self, operation: Operation, a: f64, b: f64) -> Result<f64, CalcError> {
        self.check_operand(a, "operand1")?;
        self.check_operand(b, "operand2")?;

        let raw = operation.apply(a, b)?;
        let result = round_to(raw, self.precision);
        let calculation = Calculation::new(operation, a, b, result);

        self.history.record(calculation.clone());
        for hook in &self.hooks {
            hook(&self.history, &calculation);
        }
        debug!("recorded {calculation}");
        Ok(result)
    }

    /// Resolve an operation by name and perform it. Unknown names surface as
    /// [`CalcError::UnknownOperation`].
    pub fn perform_named(&mut self, name: &str, operands: &[f64]) -> Result<f64, CalcError> {
        let operation = Operation::parse(name)?;
        match operands {
            [a, b] => self.perform(operation, *a, *b),
            _ => Err(CalcError::InvalidArgument(format!(
                "{} takes exactly 2 operands, got {}",
                operation.name(),
                operands.len()
            ))),
        }
    }

    pub fn undo(&mut self) -> Result<Calculation, HistoryError> {
        let record = self.history.undo().map(Clone::clone)?;
        info!("undo: {record}");
        Ok(record)
    }

    pub fn redo(&mut self) -> Result<Calculation, HistoryError> {
        let record = self.history.redo().map(Clone::clone)?;
        info!("redo: {record}");
        Ok(record)
    }

    pub fn clear(&mut self) {
        self.history.clear();
        info!("history cleared");
    }

    /// Active records, oldest first.
    pub fn active_history(&self) -> &[Calculation] {
        self.history.active()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn export_csv(&self, path: &Path) -> Result<(), HistoryError> {
        save_csv(&self.history, path)
    }

    /// Replace the session log with the contents of `path`. Returns the
    /// number of records loaded.
    pub fn import_csv(&mut self, path: &Path) -> Result<usize, HistoryError> {
        let log = load_csv(path, self.history.max_size())?;
        let count = log.active().len();
        self.history = log;
        Ok(count)
    }

    fn check_operand(&self, value: f64, name: &str) -> Result<(), CalcError> {
        if !value.is_finite() {
            return Err(CalcError::InvalidArgument(format!(
                "{name} must be a finite number"
            )));
        }
        if value.abs() > self.max_input_value {
            return Err(CalcError::InvalidArgument(format!(
                "{name} exceeds the maximum allowed magnitude of {}",
                self.max_input_value
            )));
        }
        Ok(())
    }
}

/// Logging hook: records each committed calculation at info level.
pub fn logging_hook() -> CommitHook {
    Box::new(|_history, calculation| {
        info!(
            "{} {} {} = {}",
            calculation.operation.name(),
            calculation.operand_a,
            calculation.operand_b,
            calculation.result
        );
    })
}

/// Autosave hook: rewrites the CSV at `path` after every commit. Failures
/// are logged and swallowed so a broken disk never interrupts calculation.
pub fn autosave_hook(path: PathBuf) -> CommitHook {
    Box::new(move |history, _calculation| {
        if let Err(e) = save_csv(history, &path) {
            warn!("autosave to {} failed: {e}", path.display());
        }
    })
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}
