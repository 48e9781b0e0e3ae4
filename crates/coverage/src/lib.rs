//! hassfest plugin validating the coverage exclusion manifest.
//!
//! The manifest (`.coveragerc` by default) lists path patterns excluded from
//! coverage measurement. Validation enforces three rules:
//!
//! - every pattern must point at something that exists once trailing wildcard
//!   segments are removed; violations are collected and reported together as
//!   a fatal [`CoverageError::MissingReferences`];
//! - an integration with a test package must not wildcard its whole
//!   directory;
//! - an integration must not exclude any [`policy::DONT_IGNORE`] file it
//!   ships, unless the [`CoveragePolicy`] exempts it.
//!
//! The last two rules record errors on the integration through
//! [`IntegrationRecord::add_error`] and never abort validation. Errors
//! recorded by earlier runs are left untouched, so validating the same
//! integrations twice records every finding twice.

pub mod error;
pub mod omit;
pub mod policy;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;

use hassfest_common::{Config, IntegrationRecord, ManifestPath};
use log::{debug, warn};

pub use error::{CoverageError, Result};
pub use omit::OmitEntries;
pub use policy::{AllowedViolation, CoveragePolicy};

/// Plugin name attached to every recorded error.
pub const PLUGIN: &str = "coverage";

/// Prefix shared by manifest lines that refer to an integration.
const COMPONENTS_PREFIX: &str = "homeassistant/components/";

/// Segment count of `homeassistant/components/<integration>/<entry>`.
const INTEGRATION_ENTRY_SEGMENTS: usize = 4;

/// Index of the integration name within an integration entry.
const INTEGRATION_SEGMENT: usize = 2;

/// Validates the coverage manifest with the built-in policy.
///
/// # Errors
///
/// See [`validate_with`].
pub fn validate<I: IntegrationRecord>(
    integrations: &mut BTreeMap<String, I>,
    config: &Config,
) -> Result<()> {
    validate_with(integrations, config, &CoveragePolicy::default())
}

/// Validates the coverage manifest against `policy`.
///
/// # Errors
///
/// Returns [`CoverageError::ManifestUnreadable`] when the manifest cannot be
/// read, [`CoverageError::UnknownIntegration`] when an entry names an
/// integration missing from `integrations`, and
/// [`CoverageError::MissingReferences`] when any entry points at a path that
/// does not exist.
pub fn validate_with<I: IntegrationRecord>(
    integrations: &mut BTreeMap<String, I>,
    config: &Config,
    policy: &CoveragePolicy,
) -> Result<()> {
    let manifest_path = config.coverage_manifest_path();
    debug!("scanning omit block of {manifest_path}");
    let file = File::open(&manifest_path).map_err(|source| CoverageError::ManifestUnreadable {
        path: manifest_path.clone(),
        source,
    })?;

    let mut not_found = Vec::new();
    for entry in OmitEntries::new(BufReader::new(file)) {
        let line = entry.map_err(|source| CoverageError::ManifestUnreadable {
            path: manifest_path.clone(),
            source,
        })?;
        let pattern = ManifestPath::from(&line);

        if !pattern.concrete_ancestor().resolve(&config.root).exists() {
            warn!("{manifest_path} references missing path {line}");
            not_found.push(line);
            continue;
        }

        if !line.starts_with(COMPONENTS_PREFIX) || pattern.len() != INTEGRATION_ENTRY_SEGMENTS {
            continue;
        }

        check_integration_entry(integrations, config, policy, &pattern)?;
    }

    if not_found.is_empty() {
        Ok(())
    } else {
        Err(CoverageError::MissingReferences { paths: not_found })
    }
}

/// Applies the integration-level rules to one `homeassistant/components/<name>/<entry>` line.
fn check_integration_entry<I: IntegrationRecord>(
    integrations: &mut BTreeMap<String, I>,
    config: &Config,
    policy: &CoveragePolicy,
    pattern: &ManifestPath,
) -> Result<()> {
    let name = pattern.segment(INTEGRATION_SEGMENT).unwrap_or_default();
    let entry = pattern.last().unwrap_or_default();
    let integration = integrations
        .get_mut(name)
        .ok_or_else(|| CoverageError::UnknownIntegration {
            name: name.to_owned(),
        })?;
    let integration_dir = config.components_dir().join(name);

    if pattern.is_full_wildcard() && has_test_package(config, integration.domain()) {
        record(
            integration,
            name,
            "has tests and should not use wildcard in .coveragerc file".to_owned(),
        );
    }

    for &protected in policy.dont_ignore() {
        if entry != "*" && entry != protected {
            continue;
        }

        if policy.is_allowed(name, protected) {
            debug!("{name}: exclusion of {protected} is allow-listed");
            continue;
        }

        if integration_dir.join(protected).exists() {
            record(
                integration,
                name,
                format!("{protected} must not be ignored by the .coveragerc file"),
            );
        }
    }

    Ok(())
}

fn has_test_package(config: &Config, domain: &str) -> bool {
    config
        .root
        .join("tests")
        .join("components")
        .join(domain)
        .join("__init__.py")
        .exists()
}

fn record<I: IntegrationRecord>(integration: &mut I, name: &str, message: String) {
    debug!("{name}: {message}");
    integration.add_error(PLUGIN, message);
}

#[cfg(test)]
mod tests;
