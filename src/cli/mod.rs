//! CLI command handlers
//!
//! This module contains the expense shell and its commands, bridging clap
//! argument parsing with the service layer.

pub mod expense;
pub mod shell;

pub use expense::{handle_expense_command, ExpenseCommands, ShellFlow, ShellLine};
pub use shell::{run_shell, tokenize};
