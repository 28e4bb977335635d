//! CLI layer: argument parsing, usage text and command dispatch

pub mod args;
pub mod commands;
pub mod error;
pub mod usage;

pub use args::{normalize_args, Cli, Commands};
pub use commands::{execute, report, RunCommand};
pub use error::{CliError, CliResult};
pub use usage::{print_usage, render_usage};
