//! Tally - interactive command-line calculator
//!
//! A line-oriented REPL over ten arithmetic operations with an undoable
//! calculation history, CSV import/export, and autosave.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, info};

mod config;

use config::{ConfigLoader, LogLevel, TallyConfig};
use tally_repl::{parse_and_execute, CommandOutcome, ReplEngine};

#[derive(Parser)]
#[command(
    name = "tally",
    version = env!("CARGO_PKG_VERSION"),
    about = "Command-line arithmetic calculator with history, undo/redo, and CSV import/export",
    long_about = r#"
Tally is a line-oriented calculator REPL. Type an operation followed by two
numbers (`add 2 3`), or a meta-command (`undo`, `redo`, `history`,
`export <path>`, `import <path>`, `quit`). Every calculation lands in an
undoable history that can be saved to and restored from CSV.

Examples:
  tally                                    # Start the interactive REPL
  echo "add 2 3" | tally                   # Evaluate piped commands
  tally --precision 4                      # Keep four decimal places
  tally --no-autosave                      # Don't rewrite the CSV per entry
"#,
    after_help = r#"
Environment Variables:
  TALLY_DEBUG=1               Enable debug logging
  TALLY_LOG_LEVEL=debug       Set log level (error, warn, info, debug, trace)
  TALLY_MAX_HISTORY_SIZE=100  Maximum calculations kept in history
  TALLY_AUTO_SAVE=1           Autosave history after every calculation
  TALLY_AUTOSAVE_PATH=<path>  CSV file used by autosave and save/load
  TALLY_PRECISION=2           Decimal places kept in results
  TALLY_MAX_INPUT_VALUE=1e6   Largest accepted operand magnitude

Variables may also be placed in a `.env` file in the working directory.
"#
)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Set log level
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Decimal places kept in results
    #[arg(long)]
    precision: Option<u32>,

    /// Maximum calculations kept in history
    #[arg(long)]
    max_history: Option<usize>,

    /// Disable history autosave
    #[arg(long)]
    no_autosave: bool,

    /// CSV file used by autosave and the save/load commands
    #[arg(long, value_name = "PATH")]
    autosave_path: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Start the interactive REPL (the default when no command is given)
    Repl,
}

fn main() -> Result<()> {
    // `.env` entries must be in the environment before anything reads it.
    config::load_env_file()?;

    let cli = Cli::parse();

    let mut config = ConfigLoader::load().context("failed to load configuration")?;
    apply_cli_overrides(&mut config, &cli);

    let log_level = if config.logging.debug {
        log::LevelFilter::Debug
    } else {
        config.logging.level.to_filter()
    };
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .filter_level(log_level)
        .init();

    info!("Tally v{} starting", env!("CARGO_PKG_VERSION"));
    debug!("Configuration loaded: {config:?}");

    match cli.command {
        None | Some(Commands::Repl) => execute_repl(&config),
    }
}

fn apply_cli_overrides(config: &mut TallyConfig, cli: &Cli) {
    if cli.debug {
        config.logging.debug = true;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(precision) = cli.precision {
        config.runtime.precision = precision;
    }
    if let Some(max_history) = cli.max_history {
        config.history.max_size = max_history;
    }
    if cli.no_autosave {
        config.history.autosave = false;
    }
    if let Some(path) = &cli.autosave_path {
        config.history.autosave_path = path.clone();
    }
}

fn build_engine(config: &TallyConfig) -> ReplEngine {
    let mut engine = ReplEngine::with_settings(
        config.runtime.precision,
        config.runtime.max_input_value,
        config.history.max_size,
    );
    engine.add_hook(tally_core::logging_hook());
    if config.history.autosave {
        engine.add_hook(tally_core::autosave_hook(
            config.history.autosave_path.clone(),
        ));
    }
    engine
}

fn execute_repl(config: &TallyConfig) -> Result<()> {
    info!("Starting Tally REPL");

    if config.history.autosave {
        if let Some(parent) = config.history.autosave_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create autosave directory {}", parent.display())
                })?;
            }
        }
    }

    let mut engine = build_engine(config);

    let stdin_is_tty = atty::is(atty::Stream::Stdin);
    if !stdin_is_tty {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read piped input")?;
        for raw_line in buffer.lines() {
            if !process_repl_line(raw_line, &mut engine, config) {
                break;
            }
        }
        info!("Tally REPL exiting");
        return Ok(());
    }

    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    let mut rl = DefaultEditor::new().context("failed to initialize line editor")?;

    println!("Tally v{}", env!("CARGO_PKG_VERSION"));
    println!("Interactive calculator - type 'help' for commands, 'exit' to quit");
    println!();

    loop {
        let readline = rl.readline("tally> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if !line.is_empty() {
                    let _ = rl.add_history_entry(line);
                }
                if !process_repl_line(line, &mut engine, config) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Use 'exit' to quit");
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }

    info!("Tally REPL exiting");
    Ok(())
}

/// Process one line; returns false when the REPL should exit.
fn process_repl_line(line: &str, engine: &mut ReplEngine, config: &TallyConfig) -> bool {
    match parse_and_execute(line, engine, &config.history.autosave_path) {
        CommandOutcome::Exit => {
            println!("Goodbye!");
            false
        }
        CommandOutcome::Handled(message) => {
            if !message.is_empty() {
                println!("{message}");
            }
            true
        }
    }
}
