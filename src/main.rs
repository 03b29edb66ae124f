// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! dagsmith - Airflow DAG generator
//!
//! Render pipeline dependency graphs as Apache Airflow DAG files.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dagsmith::cli::{Cli, Commands};
use dagsmith::settings::CreateOverrides;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "dagsmith=debug" } else { "dagsmith=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    // Dispatch to command handlers
    match cli.command {
        Commands::Create {
            pipeline,
            env,
            target_dir,
            jinja_file,
            envs,
            custom_id,
            working_directory,
            no_overwrite,
        } => {
            let overrides = CreateOverrides {
                pipeline,
                env,
                target_dir,
                jinja_file,
                envs,
                custom_id,
                working_dir: working_directory,
                no_overwrite,
            };
            dagsmith::cli::create::run(&cli.project, overrides, cli.verbose)
        }
        Commands::Graph { pipeline, format } => {
            dagsmith::cli::graph::run(&cli.project, &pipeline, format, cli.verbose)
        }
    }
}
