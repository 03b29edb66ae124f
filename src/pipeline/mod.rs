// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! Pipeline definitions and dependency graphs
//!
//! This module defines nodes, pipelines and project files, the registry
//! that looks pipelines up by name, and the graph inversion that turns
//! "depends on" edges into "runs before" edges.

pub mod dag;
mod definition;
mod registry;

pub use dag::{invert, ForwardMap, ParentMap, TaskGraph};
pub use definition::*;
pub use registry::{PipelineRegistry, ProjectRegistry};
