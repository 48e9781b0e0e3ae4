//! Integration discovery.
//!
//! Every directory under `homeassistant/components` that ships a
//! `manifest.json` is an integration. The catalog is keyed by directory name,
//! which is also how coverage manifest lines refer to integrations.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use thiserror::Error;

use crate::model::{Integration, IntegrationManifest, Integrations};
use crate::record::IntegrationRecord;

/// Plugin name used for errors raised while loading manifests.
pub const MODEL_PLUGIN: &str = "model";

/// Errors that prevent the catalog from being built.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The discovery pattern could not be compiled.
    #[error("invalid integration discovery pattern {pattern}: {source}")]
    InvalidPattern {
        /// Pattern handed to `glob`.
        pattern: String,
        /// Underlying pattern error.
        #[source]
        source: glob::PatternError,
    },

    /// A directory entry could not be inspected.
    #[error("failed to read integration directory")]
    ReadFailed {
        /// Underlying glob traversal error.
        #[source]
        source: glob::GlobError,
    },

    /// A discovered path is not valid UTF-8.
    #[error("integration path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },
}

/// Result type alias using [`CatalogError`].
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Loads every integration below `root/homeassistant/components`.
///
/// A manifest that cannot be read or decoded does not abort loading; the
/// integration is kept with an error recorded under the `model` plugin so the
/// report shows it alongside every other finding.
///
/// # Errors
///
/// Returns an error when the discovery pattern is invalid, a directory cannot
/// be traversed, or a path is not UTF-8.
pub fn load_integrations(root: &Utf8Path) -> Result<Integrations> {
    let pattern = format!(
        "{}/homeassistant/components/*/manifest.json",
        glob::Pattern::escape(root.as_str())
    );
    let entries = glob::glob(&pattern).map_err(|source| CatalogError::InvalidPattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut integrations = Integrations::new();
    for entry in entries {
        let manifest_path = entry.map_err(|source| CatalogError::ReadFailed { source })?;
        let manifest_path = Utf8PathBuf::try_from(manifest_path).map_err(|err| {
            CatalogError::NonUtf8Path {
                path: err.as_path().display().to_string(),
            }
        })?;

        let Some(directory) = manifest_path.parent() else {
            continue;
        };
        let integration = load_integration(directory, &manifest_path);
        integrations.insert(integration.name().to_owned(), integration);
    }

    debug!("loaded {} integrations from {root}", integrations.len());
    Ok(integrations)
}

fn load_integration(directory: &Utf8Path, manifest_path: &Utf8Path) -> Integration {
    let mut integration = Integration::new(directory);

    match read_manifest(manifest_path) {
        Ok(manifest) => integration.with_manifest(manifest),
        Err(reason) => {
            warn!("invalid manifest at {manifest_path}: {reason}");
            integration.add_error(MODEL_PLUGIN, format!("Invalid manifest: {reason}"));
            integration
        }
    }
}

fn read_manifest(path: &Utf8Path) -> std::result::Result<IntegrationManifest, String> {
    let contents = fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&contents).map_err(|err| err.to_string())
}
