//! Expense Tracker - record, filter and summarise day-to-day spending
//!
//! This library provides the core of the `expenses` binary: an in-memory
//! expense store, form validation, category filtering and sorting, receipt
//! upload, summaries and exports. Two front ends share it, a ratatui TUI and
//! a line-oriented shell.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, money, categories, forms)
//! - `storage`: The in-memory expense store and sample data
//! - `services`: Validation, projection, receipts and submission
//! - `reports`: Spending summaries
//! - `export`: CSV, JSON and YAML exports
//! - `display`: Terminal tables
//! - `session`: State shared by one run of the program
//! - `cli`: The command shell
//! - `tui`: The terminal user interface
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::{ExpensePaths, Settings};
//! use expense_tracker::models::ExpenseForm;
//! use expense_tracker::session::Session;
//!
//! let paths = ExpensePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut session = Session::start(paths, settings, true);
//! let form = ExpenseForm::new().description("Lunch").amount("12.50");
//! let expense = session.service().submit(&form, None)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod session;
pub mod storage;
pub mod tui;

pub use error::{ExpenseError, ExpenseResult};
