//! Error types for swe-investigate operations.
//!
//! Defines error types for each stage of the summarization workflow:
//! - Instance ID parsing
//! - Artifact lookup
//! - Summary rendering and persistence
//! - Configuration loading

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while parsing an instance ID.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstanceIdError {
    #[error("Instance ID is empty")]
    Empty,

    #[error("Instance ID '{0}' has no '-' separating the PR number")]
    MissingSeparator(String),

    #[error("Instance ID '{0}' contains a path separator")]
    PathSeparator(String),

    #[error("Instance ID '{instance_id}' has a non-numeric PR number '{suffix}'")]
    InvalidPrNumber { instance_id: String, suffix: String },
}

/// Errors that can occur while fetching artifacts for an instance.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Runs directory does not exist: {0}")]
    RunsDirMissing(PathBuf),

    #[error("Instance '{0}' not found in dataset")]
    InstanceNotFound(String),

    #[error("Failed to load dataset '{path}': {message}")]
    Dataset { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while rendering or writing a summary document.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Invalid instance ID: {0}")]
    InstanceId(#[from] InstanceIdError),

    #[error("Artifact fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Tera template rendering error: {0}")]
    Tera(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_error_display() {
        let err = InstanceIdError::InvalidPrNumber {
            instance_id: "octocat__hello-abc".to_string(),
            suffix: "abc".to_string(),
        };
        assert!(err.to_string().contains("octocat__hello-abc"));
        assert!(err.to_string().contains("'abc'"));
    }

    #[test]
    fn test_summary_error_wraps_sources() {
        let err: SummaryError = InstanceIdError::Empty.into();
        assert!(matches!(err, SummaryError::InstanceId(InstanceIdError::Empty)));

        let err: SummaryError = FetchError::InstanceNotFound("a__b-1".to_string()).into();
        assert!(err.to_string().contains("a__b-1"));
    }
}
