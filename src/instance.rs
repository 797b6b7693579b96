//! Instance ID parsing and link construction.
//!
//! SWE-bench instance IDs encode the source repository and pull request as
//! `<owner>__<repo>-<pr_number>`, e.g. `django__django-12345`. This module
//! recovers the `(repo_path, pr_number)` pair and derives the links a summary
//! document points at.

use std::path::{Component, Path, PathBuf};

use crate::error::InstanceIdError;

/// Separator that stands in for `/` inside the repository part of an ID.
const REPO_SEPARATOR: &str = "__";

/// Split an instance ID into its repository path and PR number.
///
/// The PR number is the text after the last `-` and must be non-empty ASCII
/// digits. Every `__` in the remaining prefix becomes `/`. IDs containing
/// `/` or `\` are rejected.
///
/// # Example
///
/// ```
/// use swe_investigate::instance::parse_instance_id;
///
/// let (repo, pr) = parse_instance_id("octocat__hello-world-42").unwrap();
/// assert_eq!(repo, "octocat/hello-world");
/// assert_eq!(pr, 42);
/// ```
pub fn parse_instance_id(instance_id: &str) -> Result<(String, u64), InstanceIdError> {
    if instance_id.is_empty() {
        return Err(InstanceIdError::Empty);
    }
    // The ID doubles as the summary file name.
    if instance_id.contains(['/', '\\']) {
        return Err(InstanceIdError::PathSeparator(instance_id.to_string()));
    }

    let (prefix, suffix) = instance_id
        .rsplit_once('-')
        .ok_or_else(|| InstanceIdError::MissingSeparator(instance_id.to_string()))?;

    let invalid = || InstanceIdError::InvalidPrNumber {
        instance_id: instance_id.to_string(),
        suffix: suffix.to_string(),
    };

    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let pr_number = suffix.parse::<u64>().map_err(|_| invalid())?;

    Ok((prefix.replace(REPO_SEPARATOR, "/"), pr_number))
}

/// Build the GitHub pull request URL for an instance.
pub fn bug_link(instance_id: &str) -> Result<String, InstanceIdError> {
    let (repo_path, pr_number) = parse_instance_id(instance_id)?;
    Ok(format!("https://github.com/{}/pull/{}", repo_path, pr_number))
}

/// Express `path` relative to `base_dir`.
///
/// Markdown links only resolve relative to the document's own location, so
/// artifact paths are rewritten against the summary output directory.
/// Relative inputs are resolved against the current working directory first.
pub fn relative_link(path: &Path, base_dir: &Path) -> String {
    let path = absolutize(path);
    let base_dir = absolutize(base_dir);

    let relative = pathdiff::diff_paths(&path, &base_dir).unwrap_or(path);
    if relative.as_os_str().is_empty() {
        return ".".to_string();
    }
    relative.to_string_lossy().into_owned()
}

fn absolutize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize(&absolute)
}

/// Lexically collapse `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
