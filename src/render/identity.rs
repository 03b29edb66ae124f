// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 dagsmith contributors

//! DAG naming
//!
//! One display id drives three names: the human-readable DAG name, the
//! file it is written to, and the slug Airflow uses as the `dag_id`.

use serde::Serialize;
use tracing::warn;

/// Extension of generated Airflow DAG files
pub const DAG_EXTENSION: &str = "py";

/// Names derived for one generated DAG
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactIdentity {
    /// `{package}_{pipeline}[_{custom_id}]`, underscores preserved
    pub display_id: String,

    /// `{display_id}_dag.py`
    pub filename: String,

    /// Orchestrator-facing identifier, e.g. `hello-world-default-id1`
    pub slug: String,
}

/// Build the identity of the DAG for a package and pipeline.
///
/// Underscores around the pipeline name are stripped (`__default__` becomes
/// `default`), as are leading underscores on the custom id, so the junction
/// between parts is always a single `_`. Empty parts are allowed.
pub fn build_identity(package_name: &str, pipeline_name: &str, custom_id: &str) -> ArtifactIdentity {
    if package_name.is_empty() || pipeline_name.trim_matches('_').is_empty() {
        warn!(
            package = package_name,
            pipeline = pipeline_name,
            "empty package or pipeline name; the DAG id will be degenerate"
        );
    }

    let mut display_id = format!("{}_{}", package_name, pipeline_name.trim_matches('_'));
    if !custom_id.is_empty() {
        display_id.push('_');
        display_id.push_str(custom_id.trim_start_matches('_'));
    }

    ArtifactIdentity {
        filename: format!("{}_dag.{}", display_id, DAG_EXTENSION),
        slug: slugify(&display_id),
        display_id,
    }
}

/// Normalize a string into a lowercase, hyphen-separated identifier.
///
/// Letters with Latin-1 accents fold to their ASCII base; any run of other
/// characters outside `[a-z0-9]` becomes a single `-`. The result never
/// starts or ends with `-`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_separator = false;

    for c in value.chars().flat_map(char::to_lowercase) {
        let mut buf = [0u8; 4];
        let folded = if c.is_ascii_alphanumeric() {
            &*c.encode_utf8(&mut buf)
        } else if let Some(base) = fold_latin1(c) {
            base
        } else {
            pending_separator = true;
            continue;
        };

        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.push_str(folded);
    }

    slug
}

fn fold_latin1(c: char) -> Option<&'static str> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ß' => "ss",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        _ => return None,
    };
    Some(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_plain() {
        let id = build_identity("pkg", "ds", "");
        assert_eq!(id.display_id, "pkg_ds");
        assert_eq!(id.filename, "pkg_ds_dag.py");
        assert_eq!(id.slug, "pkg-ds");
    }

    #[test]
    fn test_identity_default_pipeline_with_custom_id() {
        let id = build_identity("pkg", "__default__", "id1");
        assert_eq!(id.display_id, "pkg_default_id1");
        assert_eq!(id.slug, "pkg-default-id1");
    }

    #[test]
    fn test_identity_custom_id_leading_underscores() {
        let id = build_identity("hello_world", "__default__", "__id1");
        assert_eq!(id.display_id, "hello_world_default_id1");
        assert_eq!(id.filename, "hello_world_default_id1_dag.py");
        assert_eq!(id.slug, "hello-world-default-id1");
    }

    #[test]
    fn test_identity_empty_parts_are_tolerated() {
        let id = build_identity("", "", "");
        assert_eq!(id.display_id, "_");
        assert_eq!(id.filename, "__dag.py");
        assert_eq!(id.slug, "");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("Hello__World  Data"), "hello-world-data");
        assert_eq!(slugify("--a--b--"), "a-b");
        assert_eq!(slugify("split: train/test (v2)"), "split-train-test-v2");
    }

    #[test]
    fn test_slugify_folds_accents() {
        assert_eq!(slugify("Café Crème"), "cafe-creme");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn test_slugify_keeps_plain_names() {
        assert_eq!(slugify("node0"), "node0");
        assert_eq!(slugify(""), "");
    }
}
