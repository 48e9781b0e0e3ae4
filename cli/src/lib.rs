//! Library surface of the `hassfest` command-line runner.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Errors that end a run
//! - [`output`] - Human and JSON report formatting

pub mod cli;
pub mod error;
pub mod output;
