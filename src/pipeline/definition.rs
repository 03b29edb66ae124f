// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! Pipeline definition structures
//!
//! Defines the schema for dagsmith project files: a package name, a set of
//! named pipelines, and optional defaults for the `create` command.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{DagsmithError, DagsmithResult};
use crate::render::slugify;

/// Name of the pipeline used when none is given on the command line
pub const DEFAULT_PIPELINE: &str = "__default__";

/// Project file (dagsmith.yaml / .json / .toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Python package the generated DAG imports and runs
    pub package_name: String,

    /// Pipelines keyed by name, in declaration order
    #[serde(default)]
    pub pipelines: IndexMap<String, PipelineSpec>,

    /// Project-level defaults for `dagsmith create`
    #[serde(default)]
    pub defaults: ProjectDefaults,
}

/// On-disk pipeline description; the name comes from the enclosing map key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Tags applied to every node in the pipeline
    #[serde(default)]
    pub tags: Vec<String>,

    /// Nodes in declaration order
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// Defaults that sit between the built-in values and command-line flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDefaults {
    #[serde(default)]
    pub env: Option<String>,

    #[serde(default)]
    pub target_dir: Option<PathBuf>,

    #[serde(default)]
    pub jinja_file: Option<PathBuf>,

    #[serde(default)]
    pub custom_id: Option<String>,

    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Environment variables exported before each task runs
    #[serde(default)]
    pub env_vars: IndexMap<String, String>,
}

impl ProjectFile {
    /// Load a project file, choosing the format from its extension
    pub fn from_file(path: &Path) -> DagsmithResult<Self> {
        if !path.exists() {
            return Err(DagsmithError::ProjectNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| DagsmithError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content)
                .map_err(|e| DagsmithError::project_parse(path, e)),
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| DagsmithError::project_parse(path, e))
            }
            Some("toml") => {
                toml::from_str(&content).map_err(|e| DagsmithError::project_parse(path, e))
            }
            _ => Err(DagsmithError::UnsupportedProjectFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parse a project from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

/// A single unit of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node name (must be unique within a pipeline)
    pub name: String,

    /// Datasets this node reads
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Datasets this node writes
    #[serde(default)]
    pub outputs: Vec<String>,

    /// Free-form tags
    #[serde(default)]
    pub tags: IndexSet<String>,

    /// Nodes that must finish first even without a shared dataset
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl Node {
    /// Create a node with the given datasets and no tags
    pub fn new(name: impl Into<String>, inputs: &[&str], outputs: &[&str]) -> Self {
        Self {
            name: name.into(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            tags: IndexSet::new(),
            depends_on: Vec::new(),
        }
    }
}

/// A named pipeline, validated and ready for graph work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    /// Pipeline name as registered
    pub name: String,

    /// Nodes in declaration order
    pub nodes: Vec<Node>,

    /// Pipeline-level tags, already merged into every node
    pub tags: IndexSet<String>,
}

impl Pipeline {
    /// Build a pipeline, merging pipeline tags into nodes and checking that
    /// node names, dataset producers and explicit dependencies are consistent.
    ///
    /// Node names must also stay distinct after [`slugify`], since the
    /// slug is the task id in the generated DAG.
    ///
    /// Cycles are not rejected here; see [`crate::pipeline::dag`].
    pub fn new(
        name: impl Into<String>,
        nodes: Vec<Node>,
        tags: impl IntoIterator<Item = String>,
    ) -> DagsmithResult<Self> {
        let name = name.into();
        let tags: IndexSet<String> = tags.into_iter().collect();

        let mut seen = IndexSet::new();
        let mut task_ids: IndexMap<String, &str> = IndexMap::new();
        let mut producers: IndexMap<&str, &str> = IndexMap::new();
        for node in &nodes {
            if !seen.insert(node.name.as_str()) {
                return Err(DagsmithError::DuplicateNode {
                    pipeline: name.clone(),
                    node: node.name.clone(),
                });
            }

            let task_id = slugify(&node.name);
            if task_id.is_empty() {
                return Err(DagsmithError::EmptyTaskId {
                    pipeline: name.clone(),
                    node: node.name.clone(),
                });
            }
            if let Some(first) = task_ids.get(&task_id) {
                return Err(DagsmithError::DuplicateTaskId {
                    pipeline: name.clone(),
                    task_id,
                    first: first.to_string(),
                    second: node.name.clone(),
                });
            }
            task_ids.insert(task_id, node.name.as_str());
            for dataset in &node.outputs {
                if let Some(first) = producers.insert(dataset.as_str(), node.name.as_str()) {
                    return Err(DagsmithError::DuplicateOutput {
                        pipeline: name.clone(),
                        dataset: dataset.clone(),
                        first: first.to_string(),
                        second: node.name.clone(),
                    });
                }
            }
        }

        for node in &nodes {
            if let Some(dep) = node.depends_on.iter().find(|d| !seen.contains(d.as_str())) {
                return Err(DagsmithError::UnknownDependency {
                    node: node.name.clone(),
                    dependency: dep.clone(),
                });
            }
        }

        let nodes = nodes
            .into_iter()
            .map(|mut node| {
                node.tags.extend(tags.iter().cloned());
                node
            })
            .collect();

        Ok(Self { name, nodes, tags })
    }

    /// Build a pipeline from its on-disk description
    pub fn from_spec(name: &str, spec: PipelineSpec) -> DagsmithResult<Self> {
        Self::new(name, spec.nodes, spec.tags)
    }

    /// Get all node names in declaration order
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    /// Map each node to the nodes it depends on.
    ///
    /// A node depends on the producer of every dataset it reads and on each
    /// entry of its `depends_on`. Every node is present as a key; roots map
    /// to an empty set. Inputs nobody produces are free (external) datasets.
    pub fn node_dependencies(&self) -> IndexMap<String, IndexSet<String>> {
        let producers: IndexMap<&str, &str> = self
            .nodes
            .iter()
            .flat_map(|n| n.outputs.iter().map(move |d| (d.as_str(), n.name.as_str())))
            .collect();

        self.nodes
            .iter()
            .map(|node| {
                let parents: IndexSet<String> = node
                    .inputs
                    .iter()
                    .filter_map(|d| producers.get(d.as_str()).copied())
                    .chain(node.depends_on.iter().map(String::as_str))
                    .filter(|parent| *parent != node.name)
                    .map(str::to_string)
                    .collect();
                (node.name.clone(), parents)
            })
            .collect()
    }
}
