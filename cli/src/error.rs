//! Errors that end a hassfest run.

use hassfest::{ConfigError, RunError};
use thiserror::Error;

/// Errors surfaced by the command-line runner.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Validation stopped before producing a report.
    #[error(transparent)]
    Run(#[from] RunError),

    /// The report could not be written.
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias using [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
