//! Configuration module for the expense tracker
//!
//! This module provides:
//! - Config directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::ExpensePaths;
pub use settings::{Settings, UploadSettings};
