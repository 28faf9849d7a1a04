//! Line-oriented expense shell
//!
//! Reads one command per line, runs it against the session, and keeps going
//! after errors until `quit`, `exit` or end of input.

use std::io::{BufRead, Write};

use clap::error::ErrorKind;
use clap::Parser;
use thiserror::Error;
use tracing::debug;

use crate::error::ExpenseResult;
use crate::session::Session;

use super::expense::{handle_expense_command, ShellFlow, ShellLine};

const PROMPT: &str = "expenses> ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unterminated quote in input")]
pub struct UnterminatedQuote;

/// Split a line into words, honouring double quotes and backslash escapes
pub fn tokenize(line: &str) -> Result<Vec<String>, UnterminatedQuote> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                    in_token = true;
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if in_quotes {
        return Err(UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Run the shell until `quit` or end of input
///
/// Command output goes to `out`, errors to `err`.
pub fn run_shell<R: BufRead, W: Write, E: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    err: &mut E,
    interactive: bool,
) -> ExpenseResult<()> {
    if interactive {
        writeln!(out, "Expense tracker shell. Type 'help' for commands.")?;
        write!(out, "{}", PROMPT)?;
        out.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        if run_line(session, &line, out, err)? == ShellFlow::Quit {
            return Ok(());
        }
        if interactive {
            write!(out, "{}", PROMPT)?;
            out.flush()?;
        }
    }

    if interactive {
        writeln!(out)?;
    }
    Ok(())
}

fn run_line<W: Write, E: Write>(
    session: &mut Session,
    line: &str,
    out: &mut W,
    err: &mut E,
) -> ExpenseResult<ShellFlow> {
    let tokens = match tokenize(line) {
        Ok(tokens) => tokens,
        Err(e) => {
            writeln!(err, "Error: {}", e)?;
            return Ok(ShellFlow::Continue);
        }
    };
    if tokens.is_empty() || tokens[0].starts_with('#') {
        return Ok(ShellFlow::Continue);
    }

    let parsed = match ShellLine::try_parse_from(&tokens) {
        Ok(parsed) => parsed,
        Err(e) => {
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    write!(out, "{}", e.render())?
                }
                _ => write!(err, "{}", e.render())?,
            }
            return Ok(ShellFlow::Continue);
        }
    };

    debug!(command = ?parsed.command, "shell command");
    match handle_expense_command(session, parsed.command, out) {
        Ok(flow) => Ok(flow),
        Err(e) => {
            writeln!(err, "Error: {}", e)?;
            Ok(ShellFlow::Continue)
        }
    }
}
