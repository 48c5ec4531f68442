//! Core application functionality
//!
//! This module contains the core application logic, including:
//! - Settings, the user config file and CLI handling
//! - The error type shared by the library
//! - The runner behind the binary

pub mod cli;
pub mod config_file;
pub mod errors;
pub mod platform;
pub mod runner;
pub mod settings;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config_file::ConfigFile;
pub use errors::PencilError;
pub use runner::run_app;
pub use settings::PencilSettings;
