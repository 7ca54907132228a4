//! CLI-level errors (wraps domain and settings errors)

use thiserror::Error;

use crate::config::SettingsError;
use crate::domain::{ErrorKind, TreeError};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Settings(#[from] SettingsError),

    #[error("node not found: {0}")]
    UnknownNode(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Settings(_) => crate::exitcode::CONFIG,
            CliError::UnknownNode(_) => crate::exitcode::DATAERR,
            CliError::Tree(e) => match e.kind() {
                ErrorKind::Type => crate::exitcode::SOFTWARE,
                ErrorKind::NotFound | ErrorKind::InvalidOperation => crate::exitcode::DATAERR,
            },
        }
    }
}
