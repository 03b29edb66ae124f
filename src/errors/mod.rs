// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! Error types for dagsmith
//!
//! Every failure carries a diagnostic code and, where a fix is obvious,
//! a help line pointing the user at it.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for dagsmith operations
pub type DagsmithResult<T> = Result<T, DagsmithError>;

/// Main error type for dagsmith
#[derive(Error, Debug, Diagnostic)]
pub enum DagsmithError {
    // ─────────────────────────────────────────────────────────────────────────
    // Project Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Project file not found: {path}")]
    #[diagnostic(
        code(dagsmith::project_not_found),
        help("Create dagsmith.yaml or point at another file with --project")
    )]
    ProjectNotFound { path: PathBuf },

    #[error("Failed to parse project file '{path}': {message}")]
    #[diagnostic(code(dagsmith::project_parse))]
    ProjectParse { path: PathBuf, message: String },

    #[error("Unsupported project file format: {path}")]
    #[diagnostic(
        code(dagsmith::unsupported_project_format),
        help("Supported extensions: .yaml, .yml, .json, .toml")
    )]
    UnsupportedProjectFormat { path: PathBuf },

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Pipeline '{name}' not found")]
    #[diagnostic(code(dagsmith::pipeline_not_found), help("Available pipelines: {available}"))]
    PipelineNotFound { name: String, available: String },

    #[error("Pipeline '{pipeline}' defines node '{node}' more than once")]
    #[diagnostic(
        code(dagsmith::duplicate_node),
        help("Node names must be unique within a pipeline")
    )]
    DuplicateNode { pipeline: String, node: String },

    #[error("Dataset '{dataset}' in pipeline '{pipeline}' is produced by both '{first}' and '{second}'")]
    #[diagnostic(
        code(dagsmith::duplicate_output),
        help("Each dataset may be written by a single node")
    )]
    DuplicateOutput {
        pipeline: String,
        dataset: String,
        first: String,
        second: String,
    },

    #[error("Nodes '{first}' and '{second}' in pipeline '{pipeline}' share the task id '{task_id}'")]
    #[diagnostic(
        code(dagsmith::duplicate_task_id),
        help("Task ids are slugified node names; rename one node so they differ after lowercasing and replacing punctuation with '-'")
    )]
    DuplicateTaskId {
        pipeline: String,
        task_id: String,
        first: String,
        second: String,
    },

    #[error("Node '{node}' in pipeline '{pipeline}' has no usable task id")]
    #[diagnostic(
        code(dagsmith::empty_task_id),
        help("Node names need at least one letter or digit")
    )]
    EmptyTaskId { pipeline: String, node: String },

    #[error("Node '{node}' depends on unknown node '{dependency}'")]
    #[diagnostic(
        code(dagsmith::unknown_dependency),
        help("Check that '{dependency}' is defined in the same pipeline")
    )]
    UnknownDependency { node: String, dependency: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Malformed environment variable assignment: '{assignment}'")]
    #[diagnostic(
        code(dagsmith::malformed_assignment),
        help("Use KEY=VALUE pairs separated by ';', e.g. \"var1=value1;var2=value2\"")
    )]
    MalformedAssignment { assignment: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Template Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Template file not found: {path}")]
    #[diagnostic(
        code(dagsmith::template_not_found),
        help("Omit --jinja-file to use the bundled Airflow template")
    )]
    TemplateNotFound { path: PathBuf },

    #[error("Template '{name}' could not be parsed: {message}")]
    #[diagnostic(code(dagsmith::template_syntax))]
    TemplateSyntax { name: String, message: String },

    #[error("Template references unknown variable '{variable}'")]
    #[diagnostic(
        code(dagsmith::missing_template_variable),
        help("Templates may only use the variables dag_name, dag_id, dependencies, env, pipeline_name, package_name, pipeline, env_vars, working_dir and contract_version")
    )]
    MissingTemplateVariable { variable: String },

    #[error("Failed to render template: {message}")]
    #[diagnostic(code(dagsmith::template_render))]
    TemplateRender { message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Output file already exists: {path}")]
    #[diagnostic(
        code(dagsmith::output_exists),
        help("Drop --no-overwrite to replace it")
    )]
    OutputExists { path: PathBuf },

    #[error("Failed to create directory '{path}': {error}")]
    #[diagnostic(code(dagsmith::directory_create_error))]
    DirectoryCreate { path: PathBuf, error: String },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(dagsmith::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(dagsmith::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(dagsmith::io_error))]
    Io { message: String },

    #[error("JSON error: {message}")]
    #[diagnostic(code(dagsmith::json_error))]
    Json { message: String },
}

impl From<std::io::Error> for DagsmithError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_json::Error> for DagsmithError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<minijinja::Error> for DagsmithError {
    fn from(e: minijinja::Error) -> Self {
        Self::TemplateRender {
            message: render_chain(&e),
        }
    }
}

impl DagsmithError {
    /// Create a project parse error from any displayable cause
    pub fn project_parse(path: &std::path::Path, cause: impl std::fmt::Display) -> Self {
        Self::ProjectParse {
            path: path.to_path_buf(),
            message: cause.to_string(),
        }
    }

    /// Create a pipeline-not-found error listing what the registry does hold
    pub fn pipeline_not_found<'a>(name: &str, available: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names: Vec<&str> = available.into_iter().collect();
        names.sort_unstable();
        let available = if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        };

        Self::PipelineNotFound {
            name: name.to_string(),
            available,
        }
    }
}

/// Flatten a minijinja error and its sources into one line.
///
/// minijinja reports the template location on the outer error and the
/// underlying cause (e.g. an undefined variable) on the source chain.
fn render_chain(e: &minijinja::Error) -> String {
    use std::error::Error;

    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_not_found_lists_sorted_names() {
        let err = DagsmithError::pipeline_not_found("missing", ["ds", "__default__"]);
        match err {
            DagsmithError::PipelineNotFound { name, available } => {
                assert_eq!(name, "missing");
                assert_eq!(available, "__default__, ds");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_pipeline_not_found_empty_registry() {
        let err = DagsmithError::pipeline_not_found("x", std::iter::empty::<&str>());
        assert!(matches!(
            err,
            DagsmithError::PipelineNotFound { ref available, .. } if available == "(none)"
        ));
    }

    #[test]
    fn test_malformed_assignment_message() {
        let err = DagsmithError::MalformedAssignment {
            assignment: "novalue".into(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed environment variable assignment: 'novalue'"
        );
    }
}
