// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! Dependency graph views of a pipeline
//!
//! Pipelines are declared in terms of "B depends on A". Orchestrators want
//! "A runs before B". [`invert`] turns one into the other; [`TaskGraph`]
//! bundles the result with a deterministic node order for rendering.

use indexmap::{IndexMap, IndexSet};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, warn};

use crate::pipeline::{Node, Pipeline};

/// node -> nodes it depends on
pub type ParentMap = IndexMap<String, IndexSet<String>>;

/// node -> nodes that depend on it
pub type ForwardMap = IndexMap<String, IndexSet<String>>;

/// Invert a parent map into a forward (parent -> children) map.
///
/// Children are recorded in the order they are encountered, so the same
/// input order always produces the same output order. Nodes without
/// dependents do not appear as keys. Cycles pass through untouched.
pub fn invert(parent_map: &ParentMap) -> ForwardMap {
    let mut forward = ForwardMap::new();
    for (child, parents) in parent_map {
        for parent in parents {
            forward
                .entry(parent.clone())
                .or_default()
                .insert(child.clone());
        }
    }
    forward
}

/// Forward edges plus a topologically ordered node list
#[derive(Debug, Clone)]
pub struct TaskGraph<'a> {
    /// parent -> children
    pub dependencies: ForwardMap,

    /// Nodes in execution order (declaration order if the graph has a cycle)
    pub nodes: Vec<&'a Node>,

    /// Whether the dependency relation contained a cycle
    pub has_cycle: bool,
}

impl<'a> TaskGraph<'a> {
    /// Build the task graph for a pipeline
    pub fn build(pipeline: &'a Pipeline) -> Self {
        let parents = pipeline.node_dependencies();

        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let indices: IndexMap<&str, NodeIndex> = pipeline
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.name.as_str(), graph.add_node(idx)))
            .collect();

        for (child, deps) in &parents {
            let child_idx = indices[child.as_str()];
            for parent in deps {
                if let Some(parent_idx) = indices.get(parent.as_str()) {
                    graph.add_edge(*parent_idx, child_idx, ());
                }
            }
        }

        // toposort starts from the highest index, so independent nodes come
        // out in declaration order.
        let (nodes, has_cycle): (Vec<&Node>, bool) = match toposort(&graph, None) {
            Ok(order) => (
                order.into_iter().map(|n| &pipeline.nodes[graph[n]]).collect(),
                false,
            ),
            Err(cycle) => {
                warn!(
                    pipeline = %pipeline.name,
                    node = %pipeline.nodes[graph[cycle.node_id()]].name,
                    "dependency cycle detected; the generated DAG will not be schedulable"
                );
                (pipeline.nodes.iter().collect(), true)
            }
        };

        let dependencies = invert(&parents);
        debug!(
            pipeline = %pipeline.name,
            nodes = nodes.len(),
            edges = dependencies.values().map(IndexSet::len).sum::<usize>(),
            "built task graph"
        );

        Self {
            dependencies,
            nodes,
            has_cycle,
        }
    }

    /// Iterate over every `(parent, child)` edge in render order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dependencies.iter().flat_map(|(parent, children)| {
            children
                .iter()
                .map(move |child| (parent.as_str(), child.as_str()))
        })
    }

    /// Children of a node; empty when nothing depends on it
    pub fn children(&self, name: &str) -> impl Iterator<Item = &str> {
        self.dependencies
            .get(name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Generate Mermaid diagram of the graph
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");

        for node in &self.nodes {
            out.push_str(&format!("    {}[{}]\n", node.name, node.name));
        }

        for (parent, child) in self.edges() {
            out.push_str(&format!("    {} --> {}\n", parent, child));
        }

        out
    }

    /// Generate DOT diagram of the graph
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph pipeline {\n");
        out.push_str("    rankdir=TB;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for (parent, child) in self.edges() {
            out.push_str(&format!("    \"{}\" -> \"{}\";\n", parent, child));
        }

        // Isolated nodes (no edges either way)
        for node in &self.nodes {
            let has_children = self.dependencies.contains_key(&node.name);
            let has_parents = self.dependencies.values().any(|c| c.contains(&node.name));
            if !has_children && !has_parents {
                out.push_str(&format!("    \"{}\";\n", node.name));
            }
        }

        out.push_str("}\n");
        out
    }

    /// Generate text representation of execution order
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        for (i, node) in self.nodes.iter().enumerate() {
            out.push_str(&format!("{}. {}", i + 1, node.name));

            let children: Vec<&str> = self.children(&node.name).collect();
            if !children.is_empty() {
                out.push_str(&format!(" [then: {}]", children.join(", ")));
            }

            out.push('\n');
        }

        out
    }
}
