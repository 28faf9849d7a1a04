use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use expense_tracker::cli::run_shell;
use expense_tracker::config::{ExpensePaths, Settings};
use expense_tracker::session::Session;
use expense_tracker::tui::run_tui;

#[derive(Parser)]
#[command(
    name = "expenses",
    author = "Kaylee Beyene",
    version,
    about = "Terminal expense tracker",
    long_about = "Record expenses by category, filter and sort them, see where the \
                  money went, and attach receipt images. Runs as a full-screen \
                  TUI or as a line-oriented shell for scripting."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level for this program; RUST_LOG takes precedence when set
    #[arg(long, global = true, default_value = "warn")]
    log_level: LevelFilter,

    /// Start with no expenses instead of the sample data
    #[arg(long, global = true)]
    no_sample: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI (default)
    #[command(alias = "ui")]
    Tui,

    /// Read expense commands from standard input
    Shell,

    /// Write a default config file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    // Log lines would corrupt the alternate screen
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();
    if !matches!(command, Commands::Tui) || rust_log_set {
        init_logger(cli.log_level);
    }

    let paths = ExpensePaths::new()?;

    match command {
        Commands::Tui => {
            let mut session = start_session(paths, cli.no_sample)?;
            run_tui(&mut session)?;
        }
        Commands::Shell => {
            let mut session = start_session(paths, cli.no_sample)?;
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            run_shell(
                &mut session,
                stdin.lock(),
                &mut io::stdout(),
                &mut io::stderr(),
                interactive,
            )?;
        }
        Commands::Init => {
            if paths.is_initialized() {
                println!(
                    "Already initialized: {}",
                    paths.settings_file().display()
                );
            } else {
                Settings::default().save(&paths)?;
                println!("Wrote default settings to {}", paths.settings_file().display());
            }
        }
        Commands::Config => {
            let settings = Settings::load_or_create(&paths)?;
            println!("Expense Tracker Configuration");
            println!("=============================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

fn start_session(paths: ExpensePaths, no_sample: bool) -> Result<Session> {
    let settings = Settings::load_or_create(&paths)?;
    let session = Session::start(paths, settings, no_sample);
    debug!(expenses = session.store.len(), "session started");
    Ok(session)
}

/// Initialize stderr logging
///
/// `RUST_LOG` wins when set. Otherwise only this program's own logs are
/// shown, at `level`.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "{}={},{}={}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            level,
            env!("CARGO_BIN_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
