// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for dagsmith.

pub mod create;
pub mod graph;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::DEFAULT_PIPELINE;

/// Airflow DAG generator for data pipelines
///
/// Turn a pipeline's dependency graph into an Airflow DAG file.
#[derive(Parser, Debug)]
#[clap(
    name = "dagsmith",
    version,
    about = "Render pipeline dependency graphs as Apache Airflow DAG files",
    long_about = None,
    after_help = "Examples:\n\
        dagsmith create                         Generate a DAG for the default pipeline\n\
        dagsmith create -p ds -i nightly        Generate a DAG for 'ds' with a custom id\n\
        dagsmith create -E \"A=1;B=2\"            Export environment variables in each task\n\
        dagsmith graph -f mermaid               Show the task graph\n\n\
        See 'dagsmith <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Project file describing the package and its pipelines
    #[clap(
        short = 'P',
        long,
        global = true,
        value_name = "FILE",
        default_value = "dagsmith.yaml",
        env = "DAGSMITH_PROJECT"
    )]
    pub project: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an Airflow DAG for a pipeline
    Create {
        /// Pipeline to convert
        #[clap(short, long, value_name = "NAME")]
        pipeline: Option<String>,

        /// Configuration environment the tasks run with [default: local]
        #[clap(short, long)]
        env: Option<String>,

        /// Directory the DAG file is written to [default: ./airflow_dags/]
        #[clap(short, long, value_name = "DIR")]
        target_dir: Option<PathBuf>,

        /// Jinja template to render instead of the bundled one
        #[clap(short, long, value_name = "FILE")]
        jinja_file: Option<PathBuf>,

        /// Environment variables for each task, as "KEY=VALUE;KEY2=VALUE2"
        #[clap(short = 'E', long)]
        envs: Option<String>,

        /// Suffix distinguishing several DAGs of the same pipeline
        #[clap(short = 'i', long)]
        custom_id: Option<String>,

        /// Directory each task changes into before running
        #[clap(short, long, value_name = "DIR")]
        working_directory: Option<PathBuf>,

        /// Fail instead of replacing an existing DAG file
        #[clap(long)]
        no_overwrite: bool,
    },

    /// Show a pipeline's task graph
    Graph {
        /// Pipeline to show
        #[clap(short, long, default_value = DEFAULT_PIPELINE)]
        pipeline: String,

        /// Output format
        #[clap(short, long, value_enum, default_value_t = GraphFormat::Text)]
        format: GraphFormat,
    },
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    Text,
    Dot,
    Mermaid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_flags() {
        let cli = Cli::try_parse_from([
            "dagsmith",
            "create",
            "-p",
            "ds",
            "-E",
            "var1=value1;var2=value2",
            "-i",
            "id1",
            "-w",
            "/opt/airflow/kedro/proj1",
            "--no-overwrite",
        ])
        .unwrap();

        match cli.command {
            Commands::Create {
                pipeline,
                envs,
                custom_id,
                working_directory,
                no_overwrite,
                env,
                ..
            } => {
                assert_eq!(pipeline.as_deref(), Some("ds"));
                assert_eq!(envs.as_deref(), Some("var1=value1;var2=value2"));
                assert_eq!(custom_id.as_deref(), Some("id1"));
                assert_eq!(
                    working_directory,
                    Some(PathBuf::from("/opt/airflow/kedro/proj1"))
                );
                assert!(no_overwrite);
                assert!(env.is_none());
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn test_graph_format_parse() {
        let cli = Cli::try_parse_from(["dagsmith", "graph", "-f", "mermaid"]).unwrap();
        match cli.command {
            Commands::Graph { pipeline, format } => {
                assert_eq!(pipeline, "__default__");
                assert_eq!(format, GraphFormat::Mermaid);
            }
            other => panic!("expected graph, got {other:?}"),
        }

        assert!(Cli::try_parse_from(["dagsmith", "graph", "-f", "svg"]).is_err());
    }
}
