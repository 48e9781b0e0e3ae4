//! Repository-wide configuration loaded from `hassfest.toml`.
//!
//! The file is optional. Each plugin reads its settings from a table named
//! after it (for example `[coverage]`). Values are deserialised when the file
//! is present and fall back to the built-in defaults otherwise; a file that
//! exists but cannot be parsed is an error rather than a silent fallback.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use hassfest_common::{Config, DEFAULT_COVERAGE_MANIFEST};
use hassfest_coverage::{AllowedViolation, CoveragePolicy};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// File name looked up at the repository root.
pub const CONFIG_FILE_NAME: &str = "hassfest.toml";

/// Errors raised while loading [`SharedConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {path}")]
    Read {
        /// Location of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for [`SharedConfig`].
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// Location of the configuration file.
        path: Utf8PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
}

/// Shared configuration for every hassfest plugin.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SharedConfig {
    /// Settings for the coverage plugin.
    pub coverage: CoverageConfig,
}

impl SharedConfig {
    /// Loads `hassfest.toml` from `root`, using defaults when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(root: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_from(&root.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from an explicit path, using defaults when the
    /// file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load_from(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |candidate| match std::fs::read_to_string(candidate) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        })
    }

    /// Loads configuration using the supplied reader.
    ///
    /// The reader returns `Ok(None)` when no file exists at `path`. This
    /// exists so tests can simulate the file system.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use hassfest::SharedConfig;
    ///
    /// let config = SharedConfig::load_with(Utf8Path::new("hassfest.toml"), |_| {
    ///     Ok(Some("[coverage]\nmanifest = \"coverage.cfg\"\n".to_owned()))
    /// })
    /// .expect("configuration should parse");
    /// assert_eq!(config.coverage.manifest, "coverage.cfg");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the reader fails or the contents cannot be
    /// parsed.
    pub fn load_with<F>(path: &Utf8Path, reader: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> io::Result<Option<String>>,
    {
        let contents = reader(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        let Some(contents) = contents else {
            debug!("no configuration at {path}; using defaults");
            return Ok(Self::default());
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Applies file-level overrides to the run configuration.
    pub fn apply(&self, config: &mut Config) {
        config.coverage_manifest.clone_from(&self.coverage.manifest);
    }

    /// Builds the coverage policy, layering configured exemptions on top of
    /// the built-in table.
    #[must_use]
    pub fn coverage_policy(&self) -> CoveragePolicy {
        CoveragePolicy::with_allowed(
            self.coverage
                .allowed_ignore_violations
                .iter()
                .map(|entry| AllowedViolation::new(&entry.integration, &entry.file)),
        )
    }
}

/// Settings for the coverage plugin.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CoverageConfig {
    /// Manifest file name relative to the repository root.
    pub manifest: String,
    /// Exemptions added to the built-in allow-list.
    pub allowed_ignore_violations: Vec<AllowedIgnore>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            manifest: DEFAULT_COVERAGE_MANIFEST.to_owned(),
            allowed_ignore_violations: Vec::new(),
        }
    }
}

/// One configured exemption from the don't-ignore rule.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AllowedIgnore {
    /// Integration directory name.
    pub integration: String,
    /// Protected file the integration may exclude.
    pub file: String,
}
