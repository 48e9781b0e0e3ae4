//! Shared model, integration catalog, and manifest path helpers for the
//! hassfest plugins.

pub mod catalog;
pub mod model;
pub mod path;
pub mod record;

pub use catalog::{CatalogError, MODEL_PLUGIN, load_integrations};
pub use model::{
    Config, DEFAULT_COVERAGE_MANIFEST, Integration, IntegrationError, IntegrationManifest,
    Integrations,
};
pub use path::{ManifestPath, WILDCARD};
#[cfg(any(test, feature = "test-support"))]
pub use record::MockIntegrationRecord;
pub use record::IntegrationRecord;
