//! Data model shared by the hassfest plugins.
//!
//! [`Config`] describes the repository under validation and [`Integration`]
//! carries one integration's manifest together with the errors plugins
//! recorded against it.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::record::IntegrationRecord;

/// Default name of the coverage exclusion manifest.
pub const DEFAULT_COVERAGE_MANIFEST: &str = ".coveragerc";

/// Integrations keyed by their directory name.
pub type Integrations = BTreeMap<String, Integration>;

/// Settings describing the repository under validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Repository root; every manifest path resolves against it.
    pub root: Utf8PathBuf,
    /// Integrations the caller wants reported. `None` reports all of them.
    pub specific_integrations: Option<Vec<String>>,
    /// File name of the coverage manifest relative to `root`.
    pub coverage_manifest: String,
}

impl Config {
    /// Creates a configuration rooted at `root` with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use hassfest_common::Config;
    ///
    /// let config = Config::new("/repo");
    /// assert_eq!(config.coverage_manifest_path(), "/repo/.coveragerc");
    /// ```
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            specific_integrations: None,
            coverage_manifest: DEFAULT_COVERAGE_MANIFEST.to_owned(),
        }
    }

    /// Returns the absolute location of the coverage manifest.
    #[must_use]
    pub fn coverage_manifest_path(&self) -> Utf8PathBuf {
        self.root.join(&self.coverage_manifest)
    }

    /// Returns the directory that holds every integration.
    #[must_use]
    pub fn components_dir(&self) -> Utf8PathBuf {
        self.root.join("homeassistant").join("components")
    }

    /// Returns `true` when `name` should appear in the report.
    #[must_use]
    pub fn is_reported(&self, name: &str) -> bool {
        self.specific_integrations
            .as_ref()
            .is_none_or(|names| names.iter().any(|candidate| candidate == name))
    }
}

/// Subset of an integration's `manifest.json` used by the plugins.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct IntegrationManifest {
    /// Domain identifier.
    pub domain: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Documentation URL.
    #[serde(default)]
    pub documentation: Option<String>,
    /// GitHub handles of the maintainers.
    #[serde(default)]
    pub codeowners: Vec<String>,
    /// Integration type such as `hub` or `device`.
    #[serde(default)]
    pub integration_type: Option<String>,
}

/// Error recorded on an integration by a plugin.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct IntegrationError {
    /// Name of the plugin that raised the error.
    pub plugin: String,
    /// Human-readable description.
    pub error: String,
}

/// One integration discovered under `homeassistant/components`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Integration {
    name: String,
    manifest: Option<IntegrationManifest>,
    errors: Vec<IntegrationError>,
}

impl Integration {
    /// Creates an integration for the directory at `path` without a manifest.
    ///
    /// The directory name becomes the integration name.
    #[must_use]
    pub fn new(path: impl AsRef<Utf8Path>) -> Self {
        let name = path.as_ref().file_name().unwrap_or_default().to_owned();
        Self {
            name,
            manifest: None,
            errors: Vec::new(),
        }
    }

    /// Attaches a decoded manifest.
    #[must_use]
    pub fn with_manifest(mut self, manifest: IntegrationManifest) -> Self {
        self.manifest = Some(manifest);
        self
    }

    /// Returns the directory name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the decoded manifest, if loading succeeded.
    #[must_use]
    pub fn manifest(&self) -> Option<&IntegrationManifest> {
        self.manifest.as_ref()
    }

    /// Returns the domain, falling back to the directory name.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.manifest
            .as_ref()
            .map_or(self.name.as_str(), |manifest| manifest.domain.as_str())
    }

    /// Returns every recorded error in insertion order.
    #[must_use]
    pub fn errors(&self) -> &[IntegrationError] {
        &self.errors
    }

    /// Returns `true` when at least one error was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl IntegrationRecord for Integration {
    fn domain(&self) -> &str {
        Self::domain(self)
    }

    fn add_error(&mut self, plugin: &str, message: String) {
        self.errors.push(IntegrationError {
            plugin: plugin.to_owned(),
            error: message,
        });
    }
}
