//! Coverage exclusion policy.
//!
//! Some integration files implement user-facing contracts and must always be
//! measured. [`DONT_IGNORE`] lists them and [`ALLOWED_IGNORE_VIOLATIONS`]
//! records the historical exemptions that predate the rule.

/// Files that must not be excluded from coverage.
pub const DONT_IGNORE: &[&str] = &[
    "config_flow.py",
    "device_action.py",
    "device_condition.py",
    "device_trigger.py",
    "diagnostics.py",
    "group.py",
    "intent.py",
    "logbook.py",
    "media_source.py",
    "scene.py",
];

/// Integrations allowed to keep excluding a [`DONT_IGNORE`] file.
///
/// These were already violating the rule when it was introduced.
pub const ALLOWED_IGNORE_VIOLATIONS: &[(&str, &str)] = &[
    ("advantage_air", "diagnostics.py"),
    ("androidtv", "diagnostics.py"),
    ("asuswrt", "diagnostics.py"),
    ("aussie_broadband", "diagnostics.py"),
    ("doorbird", "logbook.py"),
    ("ecowitt", "diagnostics.py"),
    ("elkm1", "scene.py"),
    ("fibaro", "scene.py"),
    ("hunterdouglas_powerview", "diagnostics.py"),
    ("hunterdouglas_powerview", "scene.py"),
    ("jellyfin", "media_source.py"),
    ("launch_library", "diagnostics.py"),
    ("lcn", "scene.py"),
    ("lifx_cloud", "scene.py"),
    ("lutron", "scene.py"),
    ("lutron_caseta", "scene.py"),
    ("nanoleaf", "diagnostics.py"),
    ("nanoleaf", "device_trigger.py"),
    ("nut", "diagnostics.py"),
    ("open_meteo", "diagnostics.py"),
    ("overkiz", "diagnostics.py"),
    ("overkiz", "scene.py"),
    ("philips_js", "diagnostics.py"),
    ("radio_browser", "media_source.py"),
    ("rfxtrx", "diagnostics.py"),
    ("screenlogic", "diagnostics.py"),
    ("sonos", "diagnostics.py"),
    ("stookalert", "diagnostics.py"),
    ("stookwijzer", "diagnostics.py"),
    ("synology_dsm", "diagnostics.py"),
    ("system_bridge", "media_source.py"),
    ("tractive", "diagnostics.py"),
    ("tuya", "diagnostics.py"),
    ("tuya", "scene.py"),
    ("upb", "scene.py"),
    ("velbus", "diagnostics.py"),
    ("velux", "scene.py"),
    ("verisure", "diagnostics.py"),
    ("vicare", "diagnostics.py"),
    ("xbox", "media_source.py"),
    ("xiaomi_miio", "diagnostics.py"),
    ("yale_smart_alarm", "diagnostics.py"),
];

/// Exemption for one integration and one [`DONT_IGNORE`] file.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AllowedViolation {
    /// Integration directory name.
    pub integration: String,
    /// File name inside the integration directory.
    pub file: String,
}

impl AllowedViolation {
    /// Creates an exemption.
    #[must_use]
    pub fn new(integration: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            integration: integration.into(),
            file: file.into(),
        }
    }
}

/// Immutable rule set applied by the coverage validator.
///
/// The built-in exemptions always apply; additional exemptions can be layered
/// on top but never remove a built-in one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoveragePolicy {
    additional: Vec<AllowedViolation>,
}

impl CoveragePolicy {
    /// Builds a policy with extra exemptions on top of the built-in table.
    ///
    /// # Examples
    ///
    /// ```
    /// use hassfest_coverage::policy::{AllowedViolation, CoveragePolicy};
    ///
    /// let policy = CoveragePolicy::with_allowed([AllowedViolation::new("acme", "scene.py")]);
    /// assert!(policy.is_allowed("acme", "scene.py"));
    /// assert!(policy.is_allowed("sonos", "diagnostics.py"));
    /// assert!(!policy.is_allowed("acme", "diagnostics.py"));
    /// ```
    #[must_use]
    pub fn with_allowed(additional: impl IntoIterator<Item = AllowedViolation>) -> Self {
        let mut additional: Vec<_> = additional.into_iter().collect();
        additional.sort();
        additional.dedup();
        Self { additional }
    }

    /// Returns the files that must stay covered.
    #[must_use]
    pub fn dont_ignore(&self) -> &'static [&'static str] {
        DONT_IGNORE
    }

    /// Returns `true` when `integration` may exclude `file` from coverage.
    #[must_use]
    pub fn is_allowed(&self, integration: &str, file: &str) -> bool {
        ALLOWED_IGNORE_VIOLATIONS
            .iter()
            .any(|&(name, allowed)| name == integration && allowed == file)
            || self
                .additional
                .iter()
                .any(|entry| entry.integration == integration && entry.file == file)
    }
}
