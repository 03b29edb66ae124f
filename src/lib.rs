// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! # dagsmith - Airflow DAG generator
//!
//! `dagsmith` turns a data pipeline's dependency graph into an Apache
//! Airflow DAG file. Pipelines are described in a project file as named
//! nodes reading and writing datasets; dagsmith works out which node feeds
//! which, inverts that into "runs before" edges and renders a DAG script.
//!
//! ## Quick Start
//!
//! ```bash
//! # Generate ./airflow_dags/<package>_default_dag.py
//! dagsmith create
//!
//! # Another pipeline, with task environment variables
//! dagsmith create --pipeline ds --envs "AIRFLOW_CONN=x;STAGE=prod"
//!
//! # Inspect the task graph
//! dagsmith graph --format mermaid
//! ```

pub mod cli;
pub mod errors;
pub mod pipeline;
pub mod render;
pub mod settings;
pub mod utils;

// Re-export commonly used types
pub use errors::{DagsmithError, DagsmithResult};
pub use pipeline::{invert, Node, Pipeline, PipelineRegistry, ProjectRegistry};
pub use render::{build_identity, parse_assignments, slugify, ArtifactIdentity, DagTemplate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
