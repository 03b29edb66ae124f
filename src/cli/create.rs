// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! Create command - generate an Airflow DAG file for a pipeline

use colored::Colorize;
use miette::Result;
use std::path::Path;

use crate::pipeline::ProjectRegistry;
use crate::render::{self, DagTemplate, RenderOutcome};
use crate::settings::{CreateOverrides, CreateSettings};
use crate::utils::{print_info, print_success};

/// Run the create command
pub fn run(project: &Path, overrides: CreateOverrides, verbose: bool) -> Result<()> {
    let registry = ProjectRegistry::load(project)?;
    let settings = CreateSettings::resolve(overrides, registry.defaults())?;
    let template = DagTemplate::resolve(settings.jinja_file.as_deref())?;

    let dag = render::generate(&registry, &template, settings.request())?;

    println!();
    match dag.outcome {
        RenderOutcome::Created => println!("{}", "An Airflow DAG has been generated in:".green()),
        RenderOutcome::Updated => println!("{}", "An Airflow DAG has been updated in:".green()),
        RenderOutcome::Unchanged => println!("{}", "The Airflow DAG is already up to date in:".green()),
    }
    println!("{}", dag.path.display());
    println!("{}", "This file should be copied to your Airflow DAG folder.".yellow());
    println!(
        "{}",
        "The Airflow configuration can be customized by editing this file.".green()
    );
    println!();
    println!(
        "{}",
        "This file also contains the path to the config directory, this directory will need to \
         be available to Airflow and any workers."
            .yellow()
    );
    println!();
    println!(
        "{}",
        "Additionally all data sets must have an entry in the data catalog.".yellow()
    );
    println!(
        "{}",
        "And all local paths in both the data catalog and log config must be absolute paths."
            .yellow()
    );
    println!();

    if verbose {
        println!("{}:", "DAG summary".bold());
        print_info(&format!("DAG id: {}", dag.identity.slug));
        print_info(&format!("Pipeline: {}", settings.pipeline));
        print_info(&format!("Environment: {}", settings.env));
        print_info(&format!(
            "Template: {}",
            template.path().map_or_else(|| template.name().to_string(), |p| p.display().to_string())
        ));
        for (name, value) in &settings.env_vars {
            print_info(&format!("{}={}", name, value));
        }
        if let Some(dir) = &settings.working_dir {
            print_info(&format!("Working directory: {}", dir.display()));
        }
        print_success(&format!("DAG file {}", dag.outcome));
        println!();
    }

    Ok(())
}
