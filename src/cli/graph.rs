// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! Graph command - show a pipeline's task graph

use miette::Result;
use std::path::Path;

use super::GraphFormat;
use crate::pipeline::{PipelineRegistry, ProjectRegistry, TaskGraph};
use crate::utils::print_warning;

/// Run the graph command
pub fn run(project: &Path, pipeline_name: &str, format: GraphFormat, _verbose: bool) -> Result<()> {
    let registry = ProjectRegistry::load(project)?;
    let pipeline = registry.get(pipeline_name)?;

    let graph = TaskGraph::build(pipeline);
    if graph.has_cycle {
        print_warning("Pipeline contains a dependency cycle; Airflow will reject this DAG");
    }

    let output = match format {
        GraphFormat::Text => graph.to_text(),
        GraphFormat::Dot => graph.to_dot(),
        GraphFormat::Mermaid => graph.to_mermaid(),
    };

    print!("{}", output);

    Ok(())
}
