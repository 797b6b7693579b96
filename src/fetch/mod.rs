//! Artifact sources for instance summaries.
//!
//! The summary writer only sees the [`ArtifactFetcher`] trait. Each lookup
//! returns zero or more local paths; an empty result means "nothing found"
//! and is rendered as such rather than treated as an error.

mod dataset;
mod local;

pub use dataset::{render_instance_markdown, InstanceDataset, SweBenchInstance};
pub use local::LocalRunFetcher;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::FetchError;

/// Result type alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Source of per-instance run artifacts and bug data.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Local paths of prediction run logs.
    async fn download_prediction_log(&self, instance_id: &str) -> FetchResult<Vec<PathBuf>>;

    /// Local paths of prediction trajectories.
    async fn download_prediction_trajectory(&self, instance_id: &str)
        -> FetchResult<Vec<PathBuf>>;

    /// Local paths of predicted patches.
    async fn download_patch(&self, instance_id: &str) -> FetchResult<Vec<PathBuf>>;

    /// Local paths of evaluation test output.
    async fn download_eval_test_output(&self, instance_id: &str) -> FetchResult<Vec<PathBuf>>;

    /// Link to the evaluation results folder, if an evaluation exists.
    async fn get_eval_folder_link(&self, instance_id: &str) -> FetchResult<Option<String>>;

    /// Markdown block describing the bug.
    async fn get_instance_markdown(&self, instance_id: &str) -> FetchResult<String>;
}
