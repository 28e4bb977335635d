//! CLI-level errors (wraps application errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("no command given")]
    MissingCommand,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("usage requested")]
    HelpRequested,

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the exit code for this error.
    ///
    /// Every failure, help requests included, exits with the same status.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Application(_)
            | CliError::DirectoryNotFound(_)
            | CliError::MissingCommand
            | CliError::UnknownCommand(_)
            | CliError::HelpRequested
            | CliError::InvalidArgs(_) => crate::exitcode::FAILURE,
        }
    }

    /// Whether the usage text follows the error report.
    pub fn shows_usage(&self) -> bool {
        matches!(
            self,
            CliError::MissingCommand
                | CliError::UnknownCommand(_)
                | CliError::HelpRequested
                | CliError::InvalidArgs(_)
        )
    }
}
