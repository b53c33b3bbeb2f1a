//! [`TestWorkspace`] builder for manifest and project fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::definition::{ConfigYaml, definitions_file};

/// A temporary deployment directory: a manifest at the root and one
/// sub-directory per project.
///
/// # Example
///
/// ```rust,no_run
/// use cascade_test_utils::{ConfigYaml, TestWorkspace};
///
/// let ws = TestWorkspace::new();
/// ws.write_manifest(&["infra"], &[("development", &["dev"])]);
/// ws.write_project("infra", "zones.yaml", &[ConfigYaml::new("zone", "management-zone")]);
/// ws.assert_file_exists("infra/zone.json");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root().join("manifest.yaml")
    }

    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.root().join(project)
    }

    /// Write `content` to `path` (relative to root), creating parents.
    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Write `manifest.yaml` with the given projects and
    /// `(group, environments)` pairs.
    pub fn write_manifest(&self, projects: &[&str], groups: &[(&str, &[&str])]) -> PathBuf {
        let mut manifest = String::from("projects:\n");
        for project in projects {
            manifest.push_str(&format!("  - name: {project}\n"));
        }
        manifest.push_str("environmentGroups:\n");
        for (group, environments) in groups {
            manifest.push_str(&format!("  - name: {group}\n    environments:\n"));
            for environment in *environments {
                manifest.push_str(&format!("      - name: {environment}\n"));
            }
        }
        self.write("manifest.yaml", &manifest)
    }

    /// Write a definition file into `project` together with an empty JSON
    /// template for every definition that names one.
    pub fn write_project(&self, project: &str, file: &str, configs: &[ConfigYaml]) -> PathBuf {
        let yaml = definitions_file(configs);
        for line in yaml.lines() {
            if let Some(template) = line.trim().strip_prefix("template: ") {
                let template_path = format!("{project}/{template}");
                if !self.root().join(&template_path).exists() {
                    self.write(&template_path, "{}");
                }
            }
        }
        self.write(&format!("{project}/{file}"), &yaml)
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
