//! Fatal errors raised by the coverage validator.
//!
//! Rule violations are not errors here; they are recorded on the offending
//! integration. Only problems that make the manifest itself untrustworthy
//! abort validation.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that abort coverage validation.
#[derive(Debug, Error)]
pub enum CoverageError {
    /// The manifest could not be opened or read.
    #[error("failed to read coverage manifest {path}")]
    ManifestUnreadable {
        /// Location of the manifest.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// One or more omit entries point at paths that do not exist.
    #[error(".coveragerc references files that don't exist: {}.", .paths.join(", "))]
    MissingReferences {
        /// Every offending manifest line, verbatim and in manifest order.
        paths: Vec<String>,
    },

    /// An omit entry names an integration missing from the catalog.
    #[error("coverage manifest references unknown integration {name}")]
    UnknownIntegration {
        /// Directory name taken from the manifest line.
        name: String,
    },
}

/// Result type alias using [`CoverageError`].
pub type Result<T> = std::result::Result<T, CoverageError>;
