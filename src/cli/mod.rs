//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, and the main application
//! runner.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;

// Re-export commonly used types
pub use app::{load_merged_config, run_send, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, SendOptions};
pub use presenter::Presenter;
