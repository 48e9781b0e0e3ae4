//! Runs the hassfest plugins over a repository.

use hassfest_common::{CatalogError, Config, Integrations, load_integrations};
use hassfest_coverage::CoverageError;
use log::info;
use thiserror::Error;

use crate::config::SharedConfig;

/// Fatal errors that stop a validation run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The integration catalog could not be built.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The coverage plugin aborted.
    #[error(transparent)]
    Coverage(#[from] CoverageError),
}

/// Loads the integration catalog and runs every plugin against it.
///
/// Rule violations are recorded on the returned integrations; only errors
/// that make the results untrustworthy are returned as [`RunError`].
///
/// # Errors
///
/// Returns an error when the catalog cannot be loaded or a plugin aborts.
pub fn validate_repository(
    config: &Config,
    shared: &SharedConfig,
) -> Result<Integrations, RunError> {
    let mut integrations = load_integrations(&config.root)?;
    info!("validating {} integrations", integrations.len());

    hassfest_coverage::validate_with(&mut integrations, config, &shared.coverage_policy())?;

    let invalid = integrations
        .values()
        .filter(|integration| integration.has_errors())
        .count();
    info!("{invalid} integrations have errors");

    Ok(integrations)
}
