//! hassfest validates the integrations of a Home Assistant checkout.
//!
//! The crate ties the plugins together: it loads the optional
//! `hassfest.toml`, builds the integration catalog, and runs each plugin
//! against it. Plugins record per-integration findings; only failures that
//! invalidate the whole run surface as [`RunError`].

pub mod config;
pub mod runner;

pub use config::{AllowedIgnore, CONFIG_FILE_NAME, ConfigError, CoverageConfig, SharedConfig};
pub use runner::{RunError, validate_repository};
