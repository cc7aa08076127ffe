//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! logging setup and the interactive and timed runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod input;
pub mod logging;
pub mod presenter;
pub mod session_app;
pub mod signals;

// Re-export commonly used types
pub use app::{run_record, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, RecordOptions};
pub use presenter::Presenter;
pub use session_app::run_session;
