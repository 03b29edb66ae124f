// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! Writing generated DAG files
//!
//! Output replaces whatever is at the destination unless the caller asks
//! for [`OverwritePolicy::RefuseIfExists`]. Identical inputs always produce
//! identical bytes, so re-running is safe.

use std::path::Path;
use tracing::{debug, info};

use crate::errors::{DagsmithError, DagsmithResult};

/// What to do when the output file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Replace the existing file
    #[default]
    Overwrite,
    /// Fail with [`DagsmithError::OutputExists`]
    RefuseIfExists,
}

/// Effect a write had on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// No file existed before
    Created,
    /// The file existed and its content changed
    Updated,
    /// The file existed with the same content
    Unchanged,
}

impl std::fmt::Display for RenderOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Write `content` to `path`, creating parent directories as needed
pub fn write_artifact(
    path: &Path,
    content: &str,
    policy: OverwritePolicy,
) -> DagsmithResult<RenderOutcome> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DagsmithError::DirectoryCreate {
            path: parent.to_path_buf(),
            error: e.to_string(),
        })?;
    }

    let previous = if path.exists() {
        if policy == OverwritePolicy::RefuseIfExists {
            return Err(DagsmithError::OutputExists {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path).map_err(|e| DagsmithError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Some(blake3::hash(&bytes))
    } else {
        None
    };

    std::fs::write(path, content).map_err(|e| DagsmithError::FileWriteError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let digest = blake3::hash(content.as_bytes());
    let outcome = match previous {
        None => RenderOutcome::Created,
        Some(old) if old == digest => RenderOutcome::Unchanged,
        Some(_) => RenderOutcome::Updated,
    };

    debug!(path = %path.display(), digest = %digest.to_hex(), "wrote artifact");
    info!(path = %path.display(), "DAG file {}", outcome);

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a/b/c/dag.py");

        let outcome = write_artifact(&path, "x = 1\n", OverwritePolicy::Overwrite).unwrap();

        assert_eq!(outcome, RenderOutcome::Created);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x = 1\n");
    }

    #[test]
    fn test_rewrite_reports_outcome() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dag.py");

        write_artifact(&path, "v1", OverwritePolicy::Overwrite).unwrap();
        let same = write_artifact(&path, "v1", OverwritePolicy::Overwrite).unwrap();
        let changed = write_artifact(&path, "v2", OverwritePolicy::Overwrite).unwrap();

        assert_eq!(same, RenderOutcome::Unchanged);
        assert_eq!(changed, RenderOutcome::Updated);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "v2");
    }

    #[test]
    fn test_refuse_if_exists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dag.py");
        std::fs::write(&path, "keep me").unwrap();

        let result = write_artifact(&path, "new", OverwritePolicy::RefuseIfExists);

        assert!(matches!(result, Err(DagsmithError::OutputExists { .. })));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_existing_directory_is_fine() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dag.py");

        let outcome = write_artifact(&path, "x", OverwritePolicy::RefuseIfExists).unwrap();
        assert_eq!(outcome, RenderOutcome::Created);
    }
}
