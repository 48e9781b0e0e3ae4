//! Shared test support utilities for behaviour-driven suites.
//!
//! [`TestRepository`] lays out a throwaway Home Assistant checkout in a
//! temporary directory so scenarios can exercise the real catalog loader and
//! coverage plugin against files on disk.

use std::fs;

use camino::Utf8PathBuf;
use hassfest_common::Config;
use tempfile::TempDir;

/// A repository tree rooted in a temporary directory.
pub struct TestRepository {
    _temp: TempDir,
    root: Utf8PathBuf,
    omit: Vec<String>,
}

impl TestRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_owned()).expect("non-UTF8 temp path");
        Self {
            _temp: temp,
            root,
            omit: Vec::new(),
        }
    }

    /// Creates an empty file, along with any missing parent directories.
    pub fn touch(&self, relative: &str) {
        self.write(relative, "");
    }

    /// Writes `contents` to a file relative to the root.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories");
        }
        fs::write(path, contents).expect("failed to write fixture file");
    }

    /// Adds an integration with a manifest and an `__init__.py`.
    pub fn add_integration(&self, name: &str) {
        let dir = format!("homeassistant/components/{name}");
        self.write(
            &format!("{dir}/manifest.json"),
            &format!("{{\"domain\": \"{name}\", \"name\": \"{name}\"}}"),
        );
        self.touch(&format!("{dir}/__init__.py"));
    }

    /// Adds a file to an existing integration.
    pub fn add_integration_file(&self, name: &str, file: &str) {
        self.touch(&format!("homeassistant/components/{name}/{file}"));
    }

    /// Adds a test package for `domain`.
    pub fn add_tests_package(&self, domain: &str) {
        self.touch(&format!("tests/components/{domain}/__init__.py"));
    }

    /// Queues an entry for the `omit` block of the coverage manifest.
    pub fn omit(&mut self, entry: &str) {
        self.omit.push(entry.to_owned());
    }

    /// Writes `.coveragerc` with the queued omit entries.
    pub fn write_coverage_manifest(&self) {
        let mut manifest = String::from("# Sorted by hassfest.\n[run]\nsource = homeassistant\nomit =\n");
        for entry in &self.omit {
            manifest.push_str(&format!("    {entry}\n"));
        }
        manifest.push_str("\n[report]\nexclude_lines =\n    pragma: no cover\n");
        self.write(".coveragerc", &manifest);
    }

    /// Builds a run configuration rooted at this repository.
    pub fn config(&self) -> Config {
        Config::new(self.root.clone())
    }
}
