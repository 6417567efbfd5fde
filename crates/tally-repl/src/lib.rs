//! Tally interactive command layer.
//!
//! This crate re-exports the host-agnostic session from `tally-core` so
//! callers (the `tally` CLI, tests, and embedders) can use `ReplEngine`
//! without pulling in CLI-specific dependencies, and adds the line
//! classification and execution logic shared by every front end.

mod commands;

pub use commands::{help_text, parse_and_execute, parse_line, Command, CommandOutcome};
pub use tally_core::{CalcError, CalcSession, Calculation, HistoryError, Operation};

/// Alias for the session type used by the CLI.
pub type ReplEngine = CalcSession;
