//! Command-line argument parsing.

use clap::Parser;
use handler_core::InsertionMode;
use handler_core_lsp::parse_mode;
use std::path::PathBuf;

/// Insert an event-handler stub into a TSX/JSX file
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "handler-cli", version, about = "Insert an event-handler stub into a TSX/JSX file")]
pub struct CliArgs {
    /// TSX/JSX file to edit
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Character offset right after the event prop name (trigger start)
    #[arg(value_name = "OFFSET")]
    pub offset: usize,

    /// Event prop name, e.g. onClick
    #[arg(value_name = "EVENT_NAME")]
    pub event_name: String,

    /// Declaration file searched for prop types (repeatable)
    #[arg(long = "decl", value_name = "FILE")]
    pub declarations: Vec<PathBuf>,

    /// Length of the trigger span replaced by the binding
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub trigger_len: usize,

    /// direct | interactive | completion
    #[arg(long, value_name = "MODE", default_value = "direct", value_parser = parse_mode)]
    pub mode: InsertionMode,

    /// Same as --mode interactive
    #[arg(long)]
    pub interactive: bool,

    /// Session configuration (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the result back instead of printing it
    #[arg(long)]
    pub write: bool,
}

impl CliArgs {
    /// The effective insertion mode (`--interactive` wins over `--mode`).
    pub fn insertion_mode(&self) -> InsertionMode {
        if self.interactive {
            InsertionMode::Interactive
        } else {
            self.mode
        }
    }
}
