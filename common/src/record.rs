//! Capability trait through which plugins report findings.
//!
//! Plugins never see the reporting format. They receive anything that can
//! name its domain and accept an error, so the host tooling decides how the
//! findings are aggregated and surfaced.

/// An integration that plugins can attach validation errors to.
#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
pub trait IntegrationRecord {
    /// Returns the integration's domain identifier.
    fn domain(&self) -> &str;

    /// Records an error raised by `plugin`.
    fn add_error(&mut self, plugin: &str, message: String);
}
