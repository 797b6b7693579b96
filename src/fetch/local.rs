//! Artifact lookup in a local directory of evaluated runs.
//!
//! Expected layout, one subdirectory per run:
//!
//! ```text
//! <runs_dir>/<run>/<instance_id>.log
//! <runs_dir>/<run>/<instance_id>.traj
//! <runs_dir>/<run>/patches/<instance_id>.patch
//! <runs_dir>/<run>/eval/<instance_id>/test_output.txt
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::dataset::{render_instance_markdown, InstanceDataset};
use super::{ArtifactFetcher, FetchResult};
use crate::config::InvestigateConfig;
use crate::error::FetchError;
use crate::instance::relative_link;

/// Placeholder used when no dataset is configured.
pub const NO_INSTANCE_DATA: &str = "(no instance data available)";

const EVAL_TEST_OUTPUT: &str = "test_output.txt";

/// [`ArtifactFetcher`] backed by run outputs already present on disk.
pub struct LocalRunFetcher {
    runs_dir: PathBuf,
    dataset: Option<InstanceDataset>,
    eval_link_base: Option<String>,
    summary_dir: Option<PathBuf>,
}

impl LocalRunFetcher {
    /// Creates a fetcher over `runs_dir` without bug data.
    pub fn new(runs_dir: impl Into<PathBuf>) -> Self {
        Self {
            runs_dir: runs_dir.into(),
            dataset: None,
            eval_link_base: None,
            summary_dir: None,
        }
    }

    /// Creates a fetcher from configuration, loading the dataset if one is set.
    pub async fn from_config(config: &InvestigateConfig) -> FetchResult<Self> {
        let mut fetcher = Self::new(config.runs_dir_path());
        if let Some(path) = config.dataset_file_path() {
            fetcher.dataset = Some(InstanceDataset::load(path).await?);
        }
        fetcher.eval_link_base = config.eval_link_base.clone();
        fetcher.summary_dir = Some(config.output_dir());
        Ok(fetcher)
    }

    /// Attaches a dataset for bug descriptions.
    pub fn with_dataset(mut self, dataset: InstanceDataset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    /// Sets the URL prefix for evaluation folder links.
    pub fn with_eval_link_base(mut self, eval_link_base: impl Into<String>) -> Self {
        self.eval_link_base = Some(eval_link_base.into());
        self
    }

    /// Writes local evaluation folder links relative to `summary_dir`.
    pub fn with_summary_dir(mut self, summary_dir: impl Into<PathBuf>) -> Self {
        self.summary_dir = Some(summary_dir.into());
        self
    }

    /// Run directories in lexicographic order.
    async fn run_dirs(&self) -> FetchResult<Vec<(String, PathBuf)>> {
        if !tokio::fs::try_exists(&self.runs_dir).await? {
            return Err(FetchError::RunsDirMissing(self.runs_dir.clone()));
        }

        let mut runs = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.runs_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            runs.push((name, entry.path()));
        }
        runs.sort();
        Ok(runs)
    }

    /// Existing files at `relative` under each run directory.
    async fn collect_files(&self, relative: &Path) -> FetchResult<Vec<PathBuf>> {
        let mut found = Vec::new();
        for (_, run_dir) in self.run_dirs().await? {
            let candidate = run_dir.join(relative);
            if is_file(&candidate).await? {
                found.push(candidate);
            }
        }
        debug!(artifact = %relative.display(), count = found.len(), "Collected run artifacts");
        Ok(found)
    }
}

/// Metadata for `path`, or `None` when it does not exist.
async fn metadata_if_exists(path: &Path) -> FetchResult<Option<std::fs::Metadata>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn is_file(path: &Path) -> FetchResult<bool> {
    Ok(metadata_if_exists(path).await?.is_some_and(|m| m.is_file()))
}

async fn is_dir(path: &Path) -> FetchResult<bool> {
    Ok(metadata_if_exists(path).await?.is_some_and(|m| m.is_dir()))
}

fn eval_dir(instance_id: &str) -> PathBuf {
    Path::new("eval").join(instance_id)
}

#[async_trait]
impl ArtifactFetcher for LocalRunFetcher {
    async fn download_prediction_log(&self, instance_id: &str) -> FetchResult<Vec<PathBuf>> {
        self.collect_files(Path::new(&format!("{}.log", instance_id)))
            .await
    }

    async fn download_prediction_trajectory(
        &self,
        instance_id: &str,
    ) -> FetchResult<Vec<PathBuf>> {
        self.collect_files(Path::new(&format!("{}.traj", instance_id)))
            .await
    }

    async fn download_patch(&self, instance_id: &str) -> FetchResult<Vec<PathBuf>> {
        self.collect_files(&Path::new("patches").join(format!("{}.patch", instance_id)))
            .await
    }

    async fn download_eval_test_output(&self, instance_id: &str) -> FetchResult<Vec<PathBuf>> {
        self.collect_files(&eval_dir(instance_id).join(EVAL_TEST_OUTPUT))
            .await
    }

    async fn get_eval_folder_link(&self, instance_id: &str) -> FetchResult<Option<String>> {
        for (run_name, run_dir) in self.run_dirs().await? {
            let folder = run_dir.join(eval_dir(instance_id));
            if !is_dir(&folder).await? {
                continue;
            }
            let link = match &self.eval_link_base {
                Some(base) => format!(
                    "{}/{}/eval/{}",
                    base.trim_end_matches('/'),
                    run_name,
                    instance_id
                ),
                None => match &self.summary_dir {
                    Some(summary_dir) => relative_link(&folder, summary_dir),
                    None => folder.to_string_lossy().into_owned(),
                },
            };
            return Ok(Some(link));
        }
        Ok(None)
    }

    async fn get_instance_markdown(&self, instance_id: &str) -> FetchResult<String> {
        let Some(dataset) = &self.dataset else {
            return Ok(NO_INSTANCE_DATA.to_string());
        };
        dataset
            .get(instance_id)
            .map(render_instance_markdown)
            .ok_or_else(|| FetchError::InstanceNotFound(instance_id.to_string()))
    }
}
