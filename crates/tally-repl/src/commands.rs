/// REPL commands: calculations (`add 2 3`) and meta-commands (undo, redo,
/// history, clear, export/import, save/load, help, exit).
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::ReplEngine;
use tally_core::Operation;

/// A classified line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Calculate {
        operation: Operation,
        operand_a: f64,
        operand_b: f64,
    },
    Undo,
    Redo,
    History,
    Clear,
    Export(PathBuf),
    Import(PathBuf),
    /// Export to the configured autosave path.
    Save,
    /// Import from the configured autosave path.
    Load,
    Help,
    Exit,
    Empty,
    /// Unparseable input; carries the full message to print.
    Invalid(String),
}

/// Result of executing one line.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Line was handled; message to print (may be empty).
    Handled(String),
    /// Exit the REPL.
    Exit,
}

/// Classify one line of input.
pub fn parse_line(input: &str) -> Command {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let Some(&first) = parts.first() else {
        return Command::Empty;
    };
    let keyword = first.to_ascii_lowercase();

    match keyword.as_str() {
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "history" => Command::History,
        "clear" => Command::Clear,
        "save" => Command::Save,
        "load" => Command::Load,
        "help" => Command::Help,
        "exit" | "quit" => Command::Exit,
        "export" | "import" => {
            if parts.len() != 2 {
                return Command::Invalid(format!("Usage: {keyword} <path>"));
            }
            let path = PathBuf::from(parts[1]);
            if keyword == "export" {
                Command::Export(path)
            } else {
                Command::Import(path)
            }
        }
        _ => match Operation::parse(&keyword) {
            Ok(operation) => parse_calculation(operation, &keyword, &parts[1..]),
            Err(_) => Command::Invalid(format!(
                "Unknown command: {first}\nType 'help' for available commands"
            )),
        },
    }
}

fn parse_calculation(operation: Operation, keyword: &str, args: &[&str]) -> Command {
    if args.len() != 2 {
        return Command::Invalid(format!(
            "Error: {keyword} requires exactly 2 numbers\nUsage: {keyword} <number1> <number2>"
        ));
    }
    let operand_a = match parse_number(args[0]) {
        Ok(value) => value,
        Err(message) => return Command::Invalid(message),
    };
    let operand_b = match parse_number(args[1]) {
        Ok(value) => value,
        Err(message) => return Command::Invalid(message),
    };
    Command::Calculate {
        operation,
        operand_a,
        operand_b,
    }
}

fn parse_number(token: &str) -> Result<f64, String> {
    token
        .parse::<f64>()
        .map_err(|_| format!("Error: operand must be a number, got '{token}'"))
}

/// Parse one line and execute it against the engine. `history_path` is the
/// configured autosave file used by the bare `save`/`load` commands.
pub fn parse_and_execute(
    input: &str,
    engine: &mut ReplEngine,
    history_path: &Path,
) -> CommandOutcome {
    match parse_line(input) {
        Command::Empty => CommandOutcome::Handled(String::new()),
        Command::Exit => CommandOutcome::Exit,
        Command::Help => CommandOutcome::Handled(help_text()),
        Command::Invalid(message) => CommandOutcome::Handled(message),
        Command::Calculate {
            operation,
            operand_a,
            operand_b,
        } => CommandOutcome::Handled(match engine.perform(operation, operand_a, operand_b) {
            Ok(result) => format!("Result: {result}"),
            Err(e) => format!("Error: {e}"),
        }),
        Command::Undo => CommandOutcome::Handled(match engine.undo() {
            Ok(record) => format!("Undo successful: removed {record}"),
            Err(e) => format!("Error: {e}"),
        }),
        Command::Redo => CommandOutcome::Handled(match engine.redo() {
            Ok(record) => format!("Redo successful: restored {record}"),
            Err(e) => format!("Error: {e}"),
        }),
        Command::History => CommandOutcome::Handled(render_history(engine)),
        Command::Clear => {
            engine.clear();
            CommandOutcome::Handled("History cleared".to_string())
        }
        Command::Export(path) => CommandOutcome::Handled(export_to(engine, &path)),
        Command::Import(path) => CommandOutcome::Handled(import_from(engine, &path)),
        Command::Save => CommandOutcome::Handled(export_to(engine, history_path)),
        Command::Load => CommandOutcome::Handled(import_from(engine, history_path)),
    }
}

fn export_to(engine: &ReplEngine, path: &Path) -> String {
    match engine.export_csv(path) {
        Ok(()) => format!("History saved to {}", path.display()),
        Err(e) => format!("Error: {e}"),
    }
}

fn import_from(engine: &mut ReplEngine, path: &Path) -> String {
    match engine.import_csv(path) {
        Ok(count) => format!("History loaded from {} ({count} records)", path.display()),
        Err(e) => format!("Error: {e}"),
    }
}

fn render_history(engine: &ReplEngine) -> String {
    let records = engine.active_history();
    if records.is_empty() {
        return "No calculations in history".to_string();
    }
    let mut out = String::from("Calculation History:");
    for (index, record) in records.iter().enumerate() {
        let _ = write!(out, "\n{}. {}", index + 1, record);
    }
    out
}

/// Help text listing every operation from the registry plus the
/// meta-commands.
pub fn help_text() -> String {
    let mut out = String::from("Available Commands:\n==================\n");
    out.push_str("Arithmetic Operations:\n");
    for op in Operation::all() {
        let _ = writeln!(
            out,
            "  {:<18}- {}",
            format!("{} <a> <b>", op.name()),
            op.description()
        );
    }
    out.push_str("\nHistory Commands:\n");
    out.push_str("  history           - Show calculation history\n");
    out.push_str("  clear             - Clear calculation history\n");
    out.push_str("  undo              - Undo last calculation\n");
    out.push_str("  redo              - Redo last undone calculation\n");
    out.push_str("  export <path>     - Save history to a CSV file\n");
    out.push_str("  import <path>     - Load history from a CSV file\n");
    out.push_str("  save              - Save history to the configured CSV file\n");
    out.push_str("  load              - Load history from the configured CSV file\n");
    out.push_str("\nOther Commands:\n");
    out.push_str("  help              - Show this help message\n");
    out.push_str("  exit              - Exit the calculator");
    out
}
