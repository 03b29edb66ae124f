// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! DAG templates
//!
//! A template is plain Jinja source rendered with minijinja. The bundled
//! one produces an Airflow DAG running each node through a Kedro session;
//! users may swap in their own with `--jinja-file`.

use minijinja::{AutoEscape, Environment, ErrorKind, UndefinedBehavior};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{DagsmithError, DagsmithResult};
use crate::render::context::{validate_contract, PYESCAPE_FILTER, SLUGIFY_FILTER};
use crate::render::slugify;

/// Airflow DAG template shipped with dagsmith
pub const BUNDLED_TEMPLATE: &str = include_str!("../../templates/airflow_dag_template.j2");

const BUNDLED_NAME: &str = "airflow_dag_template.j2";

/// A loaded template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DagTemplate {
    name: String,
    source: String,
    path: Option<PathBuf>,
}

impl DagTemplate {
    /// The template shipped with dagsmith
    pub fn bundled() -> Self {
        Self::from_source(BUNDLED_NAME, BUNDLED_TEMPLATE)
    }

    /// A template held in memory
    pub fn from_source(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            path: None,
        }
    }

    /// Read a template from disk
    pub fn from_file(path: &Path) -> DagsmithResult<Self> {
        if !path.is_file() {
            return Err(DagsmithError::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }

        let source = std::fs::read_to_string(path).map_err(|e| DagsmithError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        debug!(template = %path.display(), "loaded template");

        Ok(Self {
            name: path.display().to_string(),
            source,
            path: Some(path.to_path_buf()),
        })
    }

    /// Use the file at `path` if given, else the bundled template
    pub fn resolve(path: Option<&Path>) -> DagsmithResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::bundled()),
        }
    }

    /// Template name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the template was read from; `None` for in-memory templates
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Render with `context`, after checking that every top-level variable
    /// the template reads is present in it
    pub fn render(&self, context: &Value) -> DagsmithResult<String> {
        let env = environment();
        let template = env
            .template_from_named_str(&self.name, &self.source)
            .map_err(|e| DagsmithError::TemplateSyntax {
                name: self.name.clone(),
                message: e.to_string(),
            })?;

        let referenced = template.undeclared_variables(false);
        validate_contract(
            context,
            referenced
                .iter()
                .map(String::as_str)
                .filter(|name| !env.globals().any(|(global, _)| global == *name)),
        )?;

        Ok(template.render(context)?)
    }
}

/// Escape `value` for use between the quotes of a Python string literal.
///
/// The body of a JSON string uses only escapes Python also understands, so
/// it is reused as is; single quotes are escaped on top so the result fits
/// between either `'` or `"`.
pub fn python_escape(value: &str) -> Result<String, serde_json::Error> {
    let quoted = serde_json::to_string(value)?;
    Ok(quoted[1..quoted.len() - 1].replace('\'', "\\'"))
}

/// Environment shared by every render: Jinja block whitespace handling, no
/// HTML escaping, strict undefined lookups and the contract filters.
fn environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_auto_escape_callback(|_: &str| AutoEscape::None);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_filter(SLUGIFY_FILTER, |value: String| slugify(&value));
    env.add_filter(PYESCAPE_FILTER, |value: String| {
        python_escape(&value)
            .map_err(|e| minijinja::Error::new(ErrorKind::BadSerialization, e.to_string()))
    });
    env
}
