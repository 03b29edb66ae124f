// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! Settings for `dagsmith create`
//!
//! Each setting comes from the command line if given, else from the
//! project file's `defaults`, else from the built-in default.

use std::path::{Path, PathBuf};

use crate::errors::{DagsmithError, DagsmithResult};
use crate::pipeline::{ProjectDefaults, DEFAULT_PIPELINE};
use crate::render::{parse_assignments, DagRequest, EnvVars, OverwritePolicy};

/// Built-in configuration environment
pub const DEFAULT_ENV: &str = "local";

/// Built-in output directory
pub const DEFAULT_TARGET_DIR: &str = "./airflow_dags/";

/// Values supplied on the command line; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct CreateOverrides {
    pub pipeline: Option<String>,
    pub env: Option<String>,
    pub target_dir: Option<PathBuf>,
    pub jinja_file: Option<PathBuf>,
    pub envs: Option<String>,
    pub custom_id: Option<String>,
    pub working_dir: Option<PathBuf>,
    pub no_overwrite: bool,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSettings {
    pub pipeline: String,
    pub env: String,
    pub target_dir: PathBuf,
    /// `None` selects the bundled template
    pub jinja_file: Option<PathBuf>,
    pub env_vars: EnvVars,
    pub custom_id: String,
    /// Absolute path, if a working directory was requested
    pub working_dir: Option<PathBuf>,
    pub policy: OverwritePolicy,
}

impl CreateSettings {
    /// Merge command-line overrides over project defaults.
    ///
    /// Environment variables merge key by key: project defaults first, then
    /// `--envs` assignments, later ones winning.
    pub fn resolve(cli: CreateOverrides, defaults: &ProjectDefaults) -> DagsmithResult<Self> {
        let mut env_vars = defaults.env_vars.clone();
        env_vars.extend(parse_assignments(cli.envs.as_deref())?);

        let working_dir = cli
            .working_dir
            .or_else(|| defaults.working_dir.clone())
            .map(|dir| absolute(&dir))
            .transpose()?;

        Ok(Self {
            pipeline: cli.pipeline.unwrap_or_else(|| DEFAULT_PIPELINE.to_string()),
            env: cli
                .env
                .or_else(|| defaults.env.clone())
                .unwrap_or_else(|| DEFAULT_ENV.to_string()),
            target_dir: cli
                .target_dir
                .or_else(|| defaults.target_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR)),
            jinja_file: cli.jinja_file.or_else(|| defaults.jinja_file.clone()),
            env_vars,
            custom_id: cli
                .custom_id
                .or_else(|| defaults.custom_id.clone())
                .unwrap_or_default(),
            working_dir,
            policy: if cli.no_overwrite {
                OverwritePolicy::RefuseIfExists
            } else {
                OverwritePolicy::Overwrite
            },
        })
    }

    /// Borrow these settings as a render request
    pub fn request(&self) -> DagRequest<'_> {
        DagRequest {
            pipeline_name: &self.pipeline,
            env: &self.env,
            target_dir: &self.target_dir,
            custom_id: &self.custom_id,
            env_vars: self.env_vars.clone(),
            working_dir: self.working_dir.as_deref(),
            policy: self.policy,
        }
    }
}

fn absolute(path: &Path) -> DagsmithResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| DagsmithError::Io {
        message: format!("Failed to get current directory: {}", e),
    })?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let settings =
            CreateSettings::resolve(CreateOverrides::default(), &ProjectDefaults::default()).unwrap();

        assert_eq!(settings.pipeline, "__default__");
        assert_eq!(settings.env, "local");
        assert_eq!(settings.target_dir, PathBuf::from("./airflow_dags/"));
        assert!(settings.jinja_file.is_none());
        assert!(settings.env_vars.is_empty());
        assert_eq!(settings.custom_id, "");
        assert!(settings.working_dir.is_none());
        assert_eq!(settings.policy, OverwritePolicy::Overwrite);
    }

    #[test]
    fn test_project_defaults_beat_builtins() {
        let defaults = ProjectDefaults {
            env: Some("prod".into()),
            target_dir: Some(PathBuf::from("dags")),
            custom_id: Some("nightly".into()),
            ..Default::default()
        };

        let settings = CreateSettings::resolve(CreateOverrides::default(), &defaults).unwrap();

        assert_eq!(settings.env, "prod");
        assert_eq!(settings.target_dir, PathBuf::from("dags"));
        assert_eq!(settings.custom_id, "nightly");
    }

    #[test]
    fn test_cli_beats_project_defaults() {
        let defaults = ProjectDefaults {
            env: Some("prod".into()),
            jinja_file: Some(PathBuf::from("project.j2")),
            ..Default::default()
        };
        let cli = CreateOverrides {
            env: Some("staging".into()),
            jinja_file: Some(PathBuf::from("cli.j2")),
            no_overwrite: true,
            ..Default::default()
        };

        let settings = CreateSettings::resolve(cli, &defaults).unwrap();

        assert_eq!(settings.env, "staging");
        assert_eq!(settings.jinja_file, Some(PathBuf::from("cli.j2")));
        assert_eq!(settings.policy, OverwritePolicy::RefuseIfExists);
    }

    #[test]
    fn test_env_vars_merge_last_wins() {
        let mut defaults = ProjectDefaults::default();
        defaults.env_vars.insert("A".into(), "project".into());
        defaults.env_vars.insert("B".into(), "project".into());
        let cli = CreateOverrides {
            envs: Some("B=cli;C=cli".into()),
            ..Default::default()
        };

        let settings = CreateSettings::resolve(cli, &defaults).unwrap();

        assert_eq!(settings.env_vars["A"], "project");
        assert_eq!(settings.env_vars["B"], "cli");
        assert_eq!(settings.env_vars["C"], "cli");
    }

    #[test]
    fn test_malformed_envs_rejected() {
        let cli = CreateOverrides {
            envs: Some("novalue".into()),
            ..Default::default()
        };

        let result = CreateSettings::resolve(cli, &ProjectDefaults::default());
        assert!(matches!(result, Err(DagsmithError::MalformedAssignment { .. })));
    }

    #[test]
    fn test_working_dir_made_absolute() {
        let cli = CreateOverrides {
            working_dir: Some(PathBuf::from("relative/dir")),
            ..Default::default()
        };

        let settings = CreateSettings::resolve(cli, &ProjectDefaults::default()).unwrap();
        let dir = settings.working_dir.unwrap();

        assert!(dir.is_absolute());
        assert!(dir.ends_with("relative/dir"));
    }

    #[test]
    fn test_request_borrows_settings() {
        let cli = CreateOverrides {
            pipeline: Some("ds".into()),
            working_dir: Some(PathBuf::from("/opt/airflow")),
            ..Default::default()
        };
        let settings = CreateSettings::resolve(cli, &ProjectDefaults::default()).unwrap();
        let request = settings.request();

        assert_eq!(request.pipeline_name, "ds");
        assert_eq!(request.working_dir, Some(Path::new("/opt/airflow")));
    }
}
