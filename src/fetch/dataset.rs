//! SWE-bench instance records.
//!
//! Reads a locally exported SWE-bench split (a JSON array or JSON Lines, one
//! row per instance) and renders the bug description block of a summary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::FetchError;

/// Data fields for a SWE-bench instance.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SweBenchInstance {
    /// Unique instance identifier.
    pub instance_id: String,
    /// Repository in format "owner/repo".
    #[serde(default)]
    pub repo: Option<String>,
    /// Base commit SHA.
    #[serde(default)]
    pub base_commit: Option<String>,
    /// Gold patch (solution).
    #[serde(default)]
    pub patch: Option<String>,
    /// Patch adding the tests that verify the fix.
    #[serde(default)]
    pub test_patch: Option<String>,
    /// Problem statement/description.
    #[serde(default)]
    pub problem_statement: Option<String>,
    /// Comments on the issue before the fix was created.
    #[serde(default)]
    pub hints_text: Option<String>,
    /// Tests that should pass after applying the patch.
    #[serde(rename = "FAIL_TO_PASS", default, deserialize_with = "string_or_json")]
    pub fail_to_pass: Option<String>,
    /// Tests that should remain passing.
    #[serde(rename = "PASS_TO_PASS", default, deserialize_with = "string_or_json")]
    pub pass_to_pass: Option<String>,
    /// Version identifier.
    #[serde(default, deserialize_with = "string_or_json")]
    pub version: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Accepts a JSON string as-is and renders any other non-null value as JSON.
///
/// SWE-bench exports disagree on whether test lists are encoded strings or
/// arrays, and whether `version` is a string or a number.
fn string_or_json<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        },
    )
}

/// In-memory index of SWE-bench instances keyed by instance ID.
#[derive(Debug, Default)]
pub struct InstanceDataset {
    path: PathBuf,
    instances: HashMap<String, SweBenchInstance>,
}

impl InstanceDataset {
    /// Loads a dataset file.
    ///
    /// Files whose first non-whitespace byte is `[` are read as a JSON array,
    /// anything else as JSON Lines. Blank lines are skipped.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FetchError::Dataset {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let rows = Self::parse_rows(&content).map_err(|e| FetchError::Dataset {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!(path = %path.display(), rows = rows.len(), "Loaded SWE-bench dataset");

        Ok(Self {
            path: path.to_path_buf(),
            instances: rows
                .into_iter()
                .map(|row| (row.instance_id.clone(), row))
                .collect(),
        })
    }

    fn parse_rows(content: &str) -> Result<Vec<SweBenchInstance>, serde_json::Error> {
        if content.trim_start().starts_with('[') {
            return serde_json::from_str(content);
        }
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line))
            .collect()
    }

    /// Path the dataset was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of instances in the dataset.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the dataset holds no instances.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Looks up an instance by ID.
    pub fn get(&self, instance_id: &str) -> Option<&SweBenchInstance> {
        self.instances.get(instance_id)
    }
}

/// Render the bug description block for an instance.
pub fn render_instance_markdown(instance: &SweBenchInstance) -> String {
    let mut md = String::new();

    md.push_str("### Problem Statement\n\n");
    md.push_str(non_empty(&instance.problem_statement).unwrap_or("(no problem statement)"));
    md.push_str("\n\n");

    if let Some(hints) = non_empty(&instance.hints_text) {
        md.push_str("### Hints\n\n");
        md.push_str(hints);
        md.push_str("\n\n");
    }

    md.push_str("### Details\n\n");
    let details = [
        ("Repo", &instance.repo),
        ("Base Commit", &instance.base_commit),
        ("Version", &instance.version),
        ("Created At", &instance.created_at),
        ("FAIL_TO_PASS", &instance.fail_to_pass),
        ("PASS_TO_PASS", &instance.pass_to_pass),
    ];
    for (label, value) in details {
        if let Some(value) = non_empty(value) {
            md.push_str(&format!("* {}: `{}`\n", label, value));
        }
    }

    if let Some(patch) = non_empty(&instance.patch) {
        md.push_str("\n### Gold Patch\n\n```diff\n");
        md.push_str(patch.trim_end());
        md.push_str("\n```\n");
    }

    if let Some(test_patch) = non_empty(&instance.test_patch) {
        md.push_str("\n### Test Patch\n\n```diff\n");
        md.push_str(test_patch.trim_end());
        md.push_str("\n```\n");
    }

    md.trim_end().to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
