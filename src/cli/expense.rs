//! Expense commands
//!
//! The commands understood by the interactive shell, parsed with clap from
//! each input line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::display::{format_expense_details, format_expense_list};
use crate::error::{ExpenseError, ExpenseResult};
use crate::export::ExportFormat;
use crate::models::ExpenseForm;
use crate::services::{CategoryFilter, SortKey};
use crate::session::Session;

/// One line of shell input
#[derive(Parser, Debug)]
#[command(
    name = "expenses",
    no_binary_name = true,
    disable_version_flag = true,
    disable_help_flag = true,
    help_template = "Commands:\n{subcommands}"
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ExpenseCommands,
}

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// What the money was spent on
        description: String,
        /// Amount, e.g. "12.50"
        amount: String,
        /// Category (Food, Transportation, Entertainment, Shopping, Other)
        #[arg(short, long)]
        category: Option<String>,
        /// Expense date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Receipt image to upload
        #[arg(short, long)]
        receipt: Option<PathBuf>,
    },

    /// Delete an expense
    #[command(alias = "rm")]
    Delete {
        /// Expense ID or ID prefix
        id: String,
    },

    /// List expenses
    #[command(alias = "ls")]
    List {
        /// Category to show, or "All"
        #[arg(short, long)]
        category: Option<CategoryFilter>,
        /// Sort by date, amount or category
        #[arg(short, long)]
        sort: Option<SortKey>,
    },

    /// Show expense details
    Show {
        /// Expense ID or ID prefix
        id: String,
    },

    /// Show totals by category
    Summary {
        /// Label for the period covered
        #[arg(short, long)]
        period: Option<String>,
        /// Category to include, or "All"
        #[arg(short, long)]
        category: Option<CategoryFilter>,
    },

    /// Export expenses as csv, json or yaml
    Export {
        /// Output format
        format: ExportFormat,
        /// Output file, prints to the terminal when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write a timestamped file to the exports directory
        #[arg(long, conflicts_with = "output")]
        save: bool,
        /// Category to include, or "All"
        #[arg(short, long)]
        category: Option<CategoryFilter>,
        /// Sort by date, amount or category
        #[arg(short, long)]
        sort: Option<SortKey>,
    },

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Whether the shell keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlow {
    Continue,
    Quit,
}

/// File name used by `export --save`
fn default_export_name(format: ExportFormat) -> String {
    format!(
        "expenses-{}.{}",
        Local::now().format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

/// Handle an expense command
pub fn handle_expense_command<W: Write>(
    session: &mut Session,
    cmd: ExpenseCommands,
    out: &mut W,
) -> ExpenseResult<ShellFlow> {
    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            category,
            date,
            receipt,
        } => {
            let mut form = ExpenseForm::new().description(description).amount(amount);
            if let Some(category) = category {
                form = form.category(Some(category));
            }
            if let Some(date) = date {
                form = form.date(date);
            }

            let receipt = session.prepare_receipt(&form, receipt.as_deref())?;

            let expense = session.service().submit(&form, receipt.as_ref())?;
            writeln!(out, "Added expense {}: {}", expense.id, expense)?;
            if let Some(url) = &expense.receipt_url {
                writeln!(out, "Receipt: {}", url)?;
            }
        }

        ExpenseCommands::Delete { id } => {
            let removed = session.service().delete(&id)?;
            writeln!(out, "Deleted expense {}: {}", removed.id, removed)?;
        }

        ExpenseCommands::List { category, sort } => {
            let filter = category.unwrap_or(session.settings.default_filter);
            let sort = sort.unwrap_or(session.settings.default_sort);
            let options = session.display_options();
            let service = session.service();
            let projection = service.project(filter, sort);
            write!(out, "{}", format_expense_list(&projection, &options))?;
        }

        ExpenseCommands::Show { id } => {
            let options = session.display_options();
            let service = session.service();
            let expense = service.get(&id)?;
            write!(out, "{}", format_expense_details(expense, &options))?;
        }

        ExpenseCommands::Summary { period, category } => {
            let filter = category.unwrap_or(CategoryFilter::All);
            let label = period.unwrap_or_else(|| session.settings.period_label.clone());
            let symbol = session.settings.currency_symbol.clone();
            let summary = session.service().summary(filter, Some(&label));
            write!(out, "{}", summary.format_terminal(&symbol))?;
        }

        ExpenseCommands::Export {
            format,
            output,
            save,
            category,
            sort,
        } => {
            let output = if save {
                let dir = session.paths.export_dir();
                std::fs::create_dir_all(&dir).map_err(|e| {
                    ExpenseError::Export(format!("Cannot create {}: {}", dir.display(), e))
                })?;
                Some(dir.join(default_export_name(format)))
            } else {
                output
            };
            let filter = category.unwrap_or(session.settings.default_filter);
            let sort = sort.unwrap_or(session.settings.default_sort);
            let service = session.service();
            let projection = service.project(filter, sort);

            match output {
                Some(path) => {
                    let file = File::create(&path).map_err(|e| {
                        ExpenseError::Export(format!("Cannot create {}: {}", path.display(), e))
                    })?;
                    let mut writer = BufWriter::new(file);
                    format.write(&projection, &mut writer)?;
                    writer.flush()?;
                    info!(path = %path.display(), %format, count = projection.count, "expenses exported");
                    writeln!(
                        out,
                        "Exported {} expenses to {}",
                        projection.count,
                        path.display()
                    )?;
                }
                None => format.write(&projection, out)?,
            }
        }

        ExpenseCommands::Quit => return Ok(ShellFlow::Quit),
    }

    Ok(ShellFlow::Continue)
}
