//! Report formatting for validation results.
//!
//! Only integrations selected by the run configuration and carrying at
//! least one error are reported.

use hassfest_common::{Config, Integration, IntegrationError, Integrations};
use serde::Serialize;

/// Returns the reported integrations that recorded errors, in name order.
pub fn invalid_integrations<'a>(
    integrations: &'a Integrations,
    config: &'a Config,
) -> impl Iterator<Item = &'a Integration> + 'a {
    integrations
        .iter()
        .filter(|(name, integration)| config.is_reported(name) && integration.has_errors())
        .map(|(_, integration)| integration)
}

/// Format validation results for human-readable output.
///
/// # Examples
///
/// ```
/// use hassfest_cli::output::format_human;
/// use hassfest_common::{Config, Integrations};
///
/// let output = format_human(&Integrations::new(), &Config::new("."));
/// assert_eq!(output, "No errors found.");
/// ```
#[must_use]
pub fn format_human(integrations: &Integrations, config: &Config) -> String {
    let mut output = String::new();
    let mut invalid = 0_usize;

    for integration in invalid_integrations(integrations, config) {
        invalid += 1;
        output.push_str(&format!("Integration {}:\n", integration.name()));
        for error in integration.errors() {
            output.push_str(&format!(
                "  [{}] {}\n",
                error.plugin.to_uppercase(),
                error.error
            ));
        }
        output.push('\n');
    }

    if invalid == 0 {
        return String::from("No errors found.");
    }

    output.push_str(&format!("Invalid integrations: {invalid}"));
    output
}

/// Format validation results as JSON.
///
/// # Examples
///
/// ```
/// use hassfest_cli::output::format_json;
/// use hassfest_common::{Config, Integrations};
///
/// let json = format_json(&Integrations::new(), &Config::new("."));
/// assert_eq!(json, "[]");
/// ```
#[must_use]
pub fn format_json(integrations: &Integrations, config: &Config) -> String {
    let entries: Vec<IntegrationEntry<'_>> = invalid_integrations(integrations, config)
        .map(IntegrationEntry::from)
        .collect();

    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_owned())
}

/// JSON entry for an integration with errors.
#[derive(Debug, Serialize)]
pub struct IntegrationEntry<'a> {
    /// Integration directory name.
    pub integration: &'a str,
    /// Domain declared by the integration manifest.
    pub domain: &'a str,
    /// Errors in the order they were recorded.
    pub errors: &'a [IntegrationError],
}

impl<'a> From<&'a Integration> for IntegrationEntry<'a> {
    fn from(integration: &'a Integration) -> Self {
        Self {
            integration: integration.name(),
            domain: integration.domain(),
            errors: integration.errors(),
        }
    }
}
