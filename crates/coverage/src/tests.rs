//! Unit tests for coverage manifest validation.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use hassfest_common::{Integration, MockIntegrationRecord};
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

/// A throwaway repository tree rooted in a temporary directory.
struct TempRepo {
    _temp: TempDir,
    config: Config,
}

impl TempRepo {
    fn root(&self) -> &Utf8Path {
        &self.config.root
    }

    fn touch(&self, relative: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories");
        }
        fs::write(path, "").expect("failed to write fixture file");
    }

    fn integration(&self, name: &str, files: &[&str]) -> Integration {
        let dir = format!("homeassistant/components/{name}");
        self.touch(&format!("{dir}/__init__.py"));
        for file in files {
            self.touch(&format!("{dir}/{file}"));
        }
        Integration::new(self.root().join(dir))
    }

    fn tests_package(&self, domain: &str) {
        self.touch(&format!("tests/components/{domain}/__init__.py"));
    }

    fn write_omit(&self, entries: &[&str]) {
        let mut manifest = String::from("[run]\nsource = homeassistant\nomit =\n");
        for entry in entries {
            manifest.push_str(&format!("    {entry}\n"));
        }
        manifest.push_str("\n[report]\nexclude_lines =\n    pragma: no cover\n");
        fs::write(self.config.coverage_manifest_path(), manifest)
            .expect("failed to write manifest");
    }
}

#[fixture]
fn repo() -> TempRepo {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_owned()).expect("non-UTF8 temp path");
    TempRepo {
        _temp: temp,
        config: Config::new(root),
    }
}

fn catalog<const N: usize>(entries: [Integration; N]) -> BTreeMap<String, Integration> {
    entries
        .into_iter()
        .map(|integration| (integration.name().to_owned(), integration))
        .collect()
}

fn messages(integrations: &BTreeMap<String, Integration>, name: &str) -> Vec<String> {
    integrations
        .get(name)
        .map(|integration| {
            integration
                .errors()
                .iter()
                .map(|error| {
                    assert_eq!(error.plugin, PLUGIN);
                    error.error.clone()
                })
                .collect()
        })
        .unwrap_or_default()
}

fn is_coverage(plugin: &str) -> bool {
    plugin == PLUGIN
}

#[rstest]
fn clean_manifest_records_nothing(repo: TempRepo) {
    let hue = repo.integration("hue", &["light.py", "config_flow.py"]);
    repo.touch("script/hassfest/__main__.py");
    repo.write_omit(&[
        "homeassistant/components/hue/light.py",
        "script/hassfest/*",
        "homeassistant/components/hue/*/*",
    ]);
    let mut integrations = catalog([hue]);

    validate(&mut integrations, &repo.config).expect("validation should pass");

    assert!(messages(&integrations, "hue").is_empty());
}

#[rstest]
fn missing_references_are_aggregated_in_manifest_order(repo: TempRepo) {
    let hue = repo.integration("hue", &["config_flow.py"]);
    repo.write_omit(&[
        "homeassistant/components/gone/*",
        "homeassistant/components/hue/config_flow.py",
        "script/missing.py",
    ]);
    let mut integrations = catalog([hue]);

    let err = validate(&mut integrations, &repo.config).expect_err("validation should fail");

    match &err {
        CoverageError::MissingReferences { paths } => {
            assert_eq!(paths, &["homeassistant/components/gone/*", "script/missing.py"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("homeassistant/components/gone/*, script/missing.py"));
    // Scanning continued past the first missing entry.
    assert_eq!(
        messages(&integrations, "hue"),
        vec!["config_flow.py must not be ignored by the .coveragerc file"]
    );
}

#[rstest]
fn absolute_entries_are_checked_as_written(repo: TempRepo) {
    repo.touch("outside.py");
    let existing = repo.root().join("outside.py");
    let missing = repo.root().join("gone/*");
    repo.write_omit(&[existing.as_str()]);
    let mut integrations: BTreeMap<String, Integration> = BTreeMap::new();

    validate(&mut integrations, &repo.config).expect("existing absolute entry should pass");

    repo.write_omit(&[existing.as_str(), missing.as_str()]);
    let err = validate(&mut integrations, &repo.config).expect_err("validation should fail");

    match err {
        CoverageError::MissingReferences { paths } => {
            assert_eq!(paths, vec![missing.to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn lines_outside_the_omit_block_are_ignored(repo: TempRepo) {
    let hue = repo.integration("hue", &["diagnostics.py"]);
    let manifest = concat!(
        "[run]\n",
        "homeassistant/components/hue/diagnostics.py\n",
        "homeassistant/components/nowhere/*\n",
        "omit =\n",
        "[report]\n",
        "homeassistant/components/hue/*\n",
        "does/not/exist.py\n",
    );
    fs::write(repo.config.coverage_manifest_path(), manifest).expect("failed to write manifest");
    let mut integrations = catalog([hue]);

    validate(&mut integrations, &repo.config).expect("validation should pass");

    assert!(messages(&integrations, "hue").is_empty());
}

#[rstest]
#[case::with_tests(true, 1)]
#[case::without_tests(false, 0)]
fn wildcard_is_flagged_only_when_tests_exist(
    repo: TempRepo,
    #[case] has_tests: bool,
    #[case] expected: usize,
) {
    repo.integration("hue", &["light.py"]);
    if has_tests {
        repo.tests_package("hue");
    }
    repo.write_omit(&["homeassistant/components/hue/*"]);

    let mut hue = MockIntegrationRecord::new();
    hue.expect_domain().return_const("hue".to_owned());
    hue.expect_add_error()
        .withf(|plugin, message| is_coverage(plugin) && message.contains("wildcard"))
        .times(expected)
        .return_const(());
    let mut integrations = BTreeMap::from([("hue".to_owned(), hue)]);

    validate(&mut integrations, &repo.config).expect("validation should pass");
}

#[rstest]
fn wildcard_rule_looks_up_tests_by_domain(repo: TempRepo) {
    repo.integration("hue", &[]);
    repo.tests_package("philips_hue");
    repo.write_omit(&["homeassistant/components/hue/*"]);

    let mut hue = MockIntegrationRecord::new();
    hue.expect_domain().return_const("philips_hue".to_owned());
    hue.expect_add_error()
        .withf(|plugin, message| is_coverage(plugin) && message.contains("wildcard"))
        .times(1)
        .return_const(());
    let mut integrations = BTreeMap::from([("hue".to_owned(), hue)]);

    validate(&mut integrations, &repo.config).expect("validation should pass");
}

#[rstest]
#[case::explicit_file("homeassistant/components/hue/scene.py")]
#[case::wildcard("homeassistant/components/hue/*")]
fn protected_file_exclusion_is_flagged_once(repo: TempRepo, #[case] entry: &str) {
    repo.integration("hue", &["scene.py"]);
    repo.write_omit(&[entry]);

    let mut hue = MockIntegrationRecord::new();
    hue.expect_domain().return_const("hue".to_owned());
    hue.expect_add_error()
        .withf(|plugin, message| {
            is_coverage(plugin) && message == "scene.py must not be ignored by the .coveragerc file"
        })
        .times(1)
        .return_const(());
    let mut integrations = BTreeMap::from([("hue".to_owned(), hue)]);

    validate(&mut integrations, &repo.config).expect("validation should pass");
}

#[rstest]
fn protected_file_that_does_not_exist_is_not_flagged(repo: TempRepo) {
    let hue = repo.integration("hue", &["light.py"]);
    repo.write_omit(&["homeassistant/components/hue/*"]);
    let mut integrations = catalog([hue]);

    validate(&mut integrations, &repo.config).expect("validation should pass");

    assert!(messages(&integrations, "hue").is_empty());
}

#[rstest]
fn full_wildcard_flags_each_protected_file(repo: TempRepo) {
    let hue = repo.integration("hue", &["config_flow.py", "diagnostics.py", "scene.py"]);
    repo.tests_package("hue");
    repo.write_omit(&["homeassistant/components/hue/*"]);
    let mut integrations = catalog([hue]);

    validate(&mut integrations, &repo.config).expect("validation should pass");

    assert_eq!(
        messages(&integrations, "hue"),
        vec![
            "has tests and should not use wildcard in .coveragerc file",
            "config_flow.py must not be ignored by the .coveragerc file",
            "diagnostics.py must not be ignored by the .coveragerc file",
            "scene.py must not be ignored by the .coveragerc file",
        ]
    );
}

#[rstest]
fn allow_listed_exclusion_is_not_flagged(repo: TempRepo) {
    repo.integration("sonos", &["diagnostics.py"]);
    repo.write_omit(&["homeassistant/components/sonos/diagnostics.py"]);

    let mut sonos = MockIntegrationRecord::new();
    sonos.expect_add_error().never();
    let mut integrations = BTreeMap::from([("sonos".to_owned(), sonos)]);

    validate(&mut integrations, &repo.config).expect("validation should pass");
}

#[rstest]
fn allow_list_exempts_only_the_named_file(repo: TempRepo) {
    let doorbird = repo.integration("doorbird", &["logbook.py", "diagnostics.py"]);
    repo.write_omit(&["homeassistant/components/doorbird/*"]);
    let mut integrations = catalog([doorbird]);

    validate(&mut integrations, &repo.config).expect("validation should pass");

    assert_eq!(
        messages(&integrations, "doorbird"),
        vec!["diagnostics.py must not be ignored by the .coveragerc file"]
    );
}

#[rstest]
fn configured_exemption_suppresses_violation(repo: TempRepo) {
    let hue = repo.integration("hue", &["scene.py", "group.py"]);
    repo.write_omit(&["homeassistant/components/hue/*"]);
    let mut integrations = catalog([hue]);
    let policy = CoveragePolicy::with_allowed([AllowedViolation::new("hue", "scene.py")]);

    validate_with(&mut integrations, &repo.config, &policy).expect("validation should pass");

    assert_eq!(
        messages(&integrations, "hue"),
        vec!["group.py must not be ignored by the .coveragerc file"]
    );
}

#[rstest]
#[case::nested("homeassistant/components/hue/helpers/scene.py")]
#[case::integration_directory("homeassistant/components/hue")]
#[case::other_tree("script/hue/scene.py")]
fn entries_outside_integration_shape_skip_integration_rules(repo: TempRepo, #[case] entry: &str) {
    let hue = repo.integration("hue", &["scene.py", "helpers/scene.py"]);
    repo.touch("script/hue/scene.py");
    repo.write_omit(&[entry]);
    let mut integrations = catalog([hue]);

    validate(&mut integrations, &repo.config).expect("validation should pass");

    assert!(messages(&integrations, "hue").is_empty());
}

#[rstest]
fn unknown_integration_is_fatal(repo: TempRepo) {
    repo.integration("ghost", &["light.py"]);
    repo.write_omit(&["homeassistant/components/ghost/light.py"]);
    let mut integrations: BTreeMap<String, Integration> = BTreeMap::new();

    let err = validate(&mut integrations, &repo.config).expect_err("validation should fail");

    assert!(matches!(
        err,
        CoverageError::UnknownIntegration { ref name } if name == "ghost"
    ));
}

#[rstest]
fn missing_manifest_is_reported(repo: TempRepo) {
    let mut integrations: BTreeMap<String, Integration> = BTreeMap::new();

    let err = validate(&mut integrations, &repo.config).expect_err("validation should fail");

    assert!(matches!(err, CoverageError::ManifestUnreadable { .. }));
}

#[rstest]
fn custom_manifest_name_is_honoured(repo: TempRepo) {
    let config = Config {
        coverage_manifest: "coverage.cfg".to_owned(),
        ..repo.config.clone()
    };
    fs::write(
        config.coverage_manifest_path(),
        "omit =\n    missing/*\n[report]\n",
    )
    .expect("failed to write manifest");
    let mut integrations: BTreeMap<String, Integration> = BTreeMap::new();

    let err = validate(&mut integrations, &config).expect_err("validation should fail");

    assert!(matches!(err, CoverageError::MissingReferences { .. }));
}

#[rstest]
fn revalidation_appends_duplicate_findings(repo: TempRepo) {
    let hue = repo.integration("hue", &["intent.py"]);
    repo.write_omit(&["homeassistant/components/hue/intent.py"]);
    let mut integrations = catalog([hue]);

    validate(&mut integrations, &repo.config).expect("first run should pass");
    validate(&mut integrations, &repo.config).expect("second run should pass");

    let recorded = messages(&integrations, "hue");
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0], recorded[1]);
}

#[rstest]
fn missing_reference_is_logged(repo: TempRepo) {
    repo.write_omit(&["homeassistant/components/gone/*"]);
    let mut integrations: BTreeMap<String, Integration> = BTreeMap::new();
    let mut logger = logtest::Logger::start();

    validate(&mut integrations, &repo.config).expect_err("validation should fail");

    let mut warned = false;
    while let Some(record) = logger.pop() {
        if record.args().to_string().contains("homeassistant/components/gone/*") {
            warned = true;
            break;
        }
    }

    assert!(warned, "expected the missing entry to be logged");
}
