// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! DAG rendering
//!
//! Turns a pipeline into an Airflow DAG file: name it, build the template
//! context, render, write.

pub mod context;
mod env_vars;
mod identity;
mod template;
mod writer;

pub use context::{RenderContext, CONTRACT_VERSION, FILTERS, REQUIRED_VARIABLES};
pub use env_vars::{parse_assignments, EnvVars};
pub use identity::{build_identity, slugify, ArtifactIdentity, DAG_EXTENSION};
pub use template::{python_escape, DagTemplate, BUNDLED_TEMPLATE};
pub use writer::{write_artifact, OverwritePolicy, RenderOutcome};

use std::path::{Path, PathBuf};

use crate::errors::DagsmithResult;
use crate::pipeline::PipelineRegistry;

/// Render `context` with `template` into `output_path`
pub fn render(
    context: &RenderContext,
    template: &DagTemplate,
    output_path: &Path,
    policy: OverwritePolicy,
) -> DagsmithResult<RenderOutcome> {
    let value = context.to_value()?;
    let content = template.render(&value)?;
    write_artifact(output_path, &content, policy)
}

/// Inputs for generating one DAG file
#[derive(Debug, Clone)]
pub struct DagRequest<'a> {
    pub pipeline_name: &'a str,
    pub env: &'a str,
    pub target_dir: &'a Path,
    pub custom_id: &'a str,
    pub env_vars: EnvVars,
    pub working_dir: Option<&'a Path>,
    pub policy: OverwritePolicy,
}

/// Result of generating one DAG file
#[derive(Debug, Clone)]
pub struct GeneratedDag {
    pub identity: ArtifactIdentity,
    pub path: PathBuf,
    pub outcome: RenderOutcome,
}

/// Look up a pipeline and write its DAG file
pub fn generate(
    registry: &dyn PipelineRegistry,
    template: &DagTemplate,
    request: DagRequest<'_>,
) -> DagsmithResult<GeneratedDag> {
    let pipeline = registry.get(request.pipeline_name)?;
    let package_name = registry.package_name();

    let identity = build_identity(package_name, request.pipeline_name, request.custom_id);
    let path = request.target_dir.join(&identity.filename);

    let context = RenderContext::new(
        package_name,
        pipeline,
        &identity,
        request.env,
        request.env_vars,
        request.working_dir,
    );
    let outcome = render(&context, template, &path, request.policy)?;

    Ok(GeneratedDag {
        identity,
        path,
        outcome,
    })
}
