// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! Pipeline lookup by name
//!
//! Callers hand a [`PipelineRegistry`] to the render entry point instead of
//! reaching for global state. [`ProjectRegistry`] is the file-backed one.

use indexmap::IndexMap;
use std::path::Path;
use tracing::debug;

use crate::errors::{DagsmithError, DagsmithResult};
use crate::pipeline::{Pipeline, ProjectDefaults, ProjectFile};

/// Source of named pipelines for a single package
pub trait PipelineRegistry {
    /// Package the pipelines belong to
    fn package_name(&self) -> &str;

    /// Look up a pipeline by name
    fn get(&self, name: &str) -> DagsmithResult<&Pipeline>;

    /// Names of every registered pipeline
    fn names(&self) -> Vec<&str>;
}

/// Registry backed by a project file
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    package_name: String,
    pipelines: IndexMap<String, Pipeline>,
    defaults: ProjectDefaults,
}

impl ProjectRegistry {
    /// Build a registry from a parsed project, validating every pipeline
    pub fn from_project(project: ProjectFile) -> DagsmithResult<Self> {
        let pipelines = project
            .pipelines
            .into_iter()
            .map(|(name, spec)| Pipeline::from_spec(&name, spec).map(|p| (name, p)))
            .collect::<DagsmithResult<IndexMap<_, _>>>()?;

        debug!(
            package = %project.package_name,
            pipelines = pipelines.len(),
            "loaded project"
        );

        Ok(Self {
            package_name: project.package_name,
            pipelines,
            defaults: project.defaults,
        })
    }

    /// Load and validate a project file
    pub fn load(path: &Path) -> DagsmithResult<Self> {
        Self::from_project(ProjectFile::from_file(path)?)
    }

    /// Project-level defaults for the create command
    pub fn defaults(&self) -> &ProjectDefaults {
        &self.defaults
    }
}

impl PipelineRegistry for ProjectRegistry {
    fn package_name(&self) -> &str {
        &self.package_name
    }

    fn get(&self, name: &str) -> DagsmithResult<&Pipeline> {
        self.pipelines
            .get(name)
            .ok_or_else(|| DagsmithError::pipeline_not_found(name, self.names()))
    }

    fn names(&self) -> Vec<&str> {
        self.pipelines.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROJECT_YAML: &str = r#"
package_name: hello_world
pipelines:
  __default__:
    nodes:
      - name: node0
        inputs: [input]
        outputs: [intermediate]
      - name: node1
        inputs: [intermediate]
        outputs: [output]
  ds:
    nodes:
      - name: train
"#;

    #[test]
    fn test_lookup_hit() {
        let project = ProjectFile::from_yaml(PROJECT_YAML).unwrap();
        let registry = ProjectRegistry::from_project(project).unwrap();

        assert_eq!(registry.package_name(), "hello_world");
        assert_eq!(registry.get("ds").unwrap().node_names(), vec!["train"]);
        assert_eq!(registry.names(), vec!["__default__", "ds"]);
    }

    #[test]
    fn test_lookup_miss() {
        let project = ProjectFile::from_yaml(PROJECT_YAML).unwrap();
        let registry = ProjectRegistry::from_project(project).unwrap();

        match registry.get("missing") {
            Err(DagsmithError::PipelineNotFound { name, available }) => {
                assert_eq!(name, "missing");
                assert_eq!(available, "__default__, ds");
            }
            other => panic!("expected PipelineNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_pipeline_fails_load() {
        let yaml = r#"
package_name: pkg
pipelines:
  p:
    nodes:
      - name: a
      - name: a
"#;
        let project = ProjectFile::from_yaml(yaml).unwrap();
        let result = ProjectRegistry::from_project(project);
        assert!(matches!(result, Err(DagsmithError::DuplicateNode { .. })));
    }

    #[test]
    fn test_load_yaml_json_and_toml() {
        let temp_dir = TempDir::new().unwrap();

        let yaml = temp_dir.path().join("dagsmith.yaml");
        std::fs::write(&yaml, PROJECT_YAML).unwrap();

        let json = temp_dir.path().join("dagsmith.json");
        std::fs::write(
            &json,
            r#"{"package_name": "hello_world", "pipelines": {"ds": {"nodes": [{"name": "train"}]}}}"#,
        )
        .unwrap();

        let toml = temp_dir.path().join("dagsmith.toml");
        std::fs::write(
            &toml,
            "package_name = \"hello_world\"\n\n[[pipelines.ds.nodes]]\nname = \"train\"\n",
        )
        .unwrap();

        for path in [yaml, json, toml] {
            let registry = ProjectRegistry::load(&path).unwrap();
            assert_eq!(registry.package_name(), "hello_world");
            assert!(registry.get("ds").is_ok(), "{} should define ds", path.display());
        }
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ProjectRegistry::load(&temp_dir.path().join("nope.yaml"));
        assert!(matches!(result, Err(DagsmithError::ProjectNotFound { .. })));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dagsmith.ini");
        std::fs::write(&path, "package_name=x").unwrap();

        let result = ProjectRegistry::load(&path);
        assert!(matches!(
            result,
            Err(DagsmithError::UnsupportedProjectFormat { .. })
        ));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dagsmith.yaml");
        std::fs::write(&path, "pipelines: [unclosed").unwrap();

        let result = ProjectRegistry::load(&path);
        assert!(matches!(result, Err(DagsmithError::ProjectParse { .. })));
    }
}
