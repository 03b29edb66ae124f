// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! Values handed to DAG templates
//!
//! Templates are user-replaceable, so the variables and filters they can
//! rely on form a versioned contract. Every variable a template references
//! is checked against the context before rendering.

use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::errors::{DagsmithError, DagsmithResult};
use crate::pipeline::{ForwardMap, Node, Pipeline, TaskGraph};
use crate::render::{ArtifactIdentity, EnvVars};

/// Version of the variable set below; bump when a variable changes meaning
pub const CONTRACT_VERSION: u32 = 1;

/// Variables every template may rely on
pub const REQUIRED_VARIABLES: &[&str] = &[
    "dag_name",
    "dag_id",
    "dependencies",
    "env",
    "pipeline_name",
    "package_name",
    "pipeline",
    "env_vars",
    "working_dir",
    "contract_version",
];

/// Filter turning any string into an orchestrator-safe identifier
pub const SLUGIFY_FILTER: &str = "slugify";

/// Filter escaping a string for use inside a quoted Python literal
pub const PYESCAPE_FILTER: &str = "pyescape";

/// Filters every template may rely on
pub const FILTERS: &[&str] = &[SLUGIFY_FILTER, PYESCAPE_FILTER];

/// Pipeline as seen by a template: nodes in execution order
#[derive(Debug, Clone, Serialize)]
pub struct PipelineView {
    pub name: String,
    pub tags: IndexSet<String>,
    pub nodes: Vec<Node>,
}

/// Everything a template is rendered with
#[derive(Debug, Clone, Serialize)]
pub struct RenderContext {
    /// Display id, e.g. `hello_world_default`
    pub dag_name: String,

    /// Slugified display id, e.g. `hello-world-default`
    pub dag_id: String,

    /// parent -> children
    pub dependencies: ForwardMap,

    /// Configuration environment the tasks run with
    pub env: String,

    pub pipeline_name: String,
    pub package_name: String,
    pub pipeline: PipelineView,
    pub env_vars: EnvVars,

    /// Directory tasks change into before running, if any
    pub working_dir: Option<String>,

    pub contract_version: u32,
}

impl RenderContext {
    /// Assemble the context for one pipeline
    pub fn new(
        package_name: &str,
        pipeline: &Pipeline,
        identity: &ArtifactIdentity,
        env: &str,
        env_vars: EnvVars,
        working_dir: Option<&Path>,
    ) -> Self {
        let graph = TaskGraph::build(pipeline);

        Self {
            dag_name: identity.display_id.clone(),
            dag_id: identity.slug.clone(),
            pipeline: PipelineView {
                name: pipeline.name.clone(),
                tags: pipeline.tags.clone(),
                nodes: graph.nodes.iter().map(|n| (*n).clone()).collect(),
            },
            dependencies: graph.dependencies,
            env: env.to_string(),
            pipeline_name: pipeline.name.clone(),
            package_name: package_name.to_string(),
            env_vars,
            working_dir: working_dir.map(|p| p.display().to_string()),
            contract_version: CONTRACT_VERSION,
        }
    }

    /// Serialize the context for a template
    pub fn to_value(&self) -> DagsmithResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Ensure every variable a template references is present in `context`.
///
/// Names are checked in sorted order so the reported variable is stable.
pub fn validate_contract<'a>(
    context: &Value,
    referenced: impl IntoIterator<Item = &'a str>,
) -> DagsmithResult<()> {
    let mut referenced: Vec<&str> = referenced.into_iter().collect();
    referenced.sort_unstable();

    let fields = context.as_object();
    match referenced
        .into_iter()
        .find(|name| !fields.is_some_and(|f| f.contains_key(*name)))
    {
        Some(variable) => Err(DagsmithError::MissingTemplateVariable {
            variable: variable.to_string(),
        }),
        None => Ok(()),
    }
}
