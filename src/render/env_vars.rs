// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! `KEY=VALUE;KEY2=VALUE2` parsing for `--envs`

use indexmap::IndexMap;

use crate::errors::{DagsmithError, DagsmithResult};

/// Environment variables exported by the generated DAG, in insertion order
pub type EnvVars = IndexMap<String, String>;

/// Parse a semicolon-separated list of assignments.
///
/// Each assignment splits on its first `=`, so values may contain `=`.
/// A later assignment to the same key replaces the earlier one. Empty
/// segments (e.g. from a trailing `;`) are ignored; a segment without any
/// `=` is rejected.
pub fn parse_assignments(raw: Option<&str>) -> DagsmithResult<EnvVars> {
    let mut vars = EnvVars::new();
    let Some(raw) = raw else {
        return Ok(vars);
    };

    for assignment in raw.split(';') {
        if assignment.trim().is_empty() {
            continue;
        }

        let (name, value) =
            assignment
                .split_once('=')
                .ok_or_else(|| DagsmithError::MalformedAssignment {
                    assignment: assignment.to_string(),
                })?;

        vars.insert(name.trim().to_string(), value.to_string());
    }

    Ok(vars)
}
