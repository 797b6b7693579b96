//! Configuration for instance summarization.
//!
//! All locations are derived from an explicit base directory rather than the
//! location of the running binary, so tests and alternative layouts can point
//! the tool anywhere.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default name of the directory that receives summary documents.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "investigation-data";

/// Default script used to open an instance's repository.
pub const DEFAULT_OPEN_REPO_SCRIPT: &str = "open_repo.sh";

/// Default directory (relative to the base directory) holding run outputs.
pub const DEFAULT_RUNS_DIR: &str = "runs";

/// Configuration for the summarization workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestigateConfig {
    /// Directory every relative location below is resolved against.
    pub base_dir: PathBuf,
    /// Name of the summary output directory under `base_dir`.
    pub output_dir_name: String,
    /// Script invoked once per instance by `--open-repo`.
    pub open_repo_script: PathBuf,
    /// Directory containing one subdirectory per evaluated run.
    pub runs_dir: PathBuf,
    /// Optional SWE-bench dataset file (JSON array or JSON Lines).
    pub dataset_path: Option<PathBuf>,
    /// Optional URL prefix for evaluation folder links.
    pub eval_link_base: Option<String>,
}

impl Default for InvestigateConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            output_dir_name: DEFAULT_OUTPUT_DIR_NAME.to_string(),
            open_repo_script: PathBuf::from(DEFAULT_OPEN_REPO_SCRIPT),
            runs_dir: PathBuf::from(DEFAULT_RUNS_DIR),
            dataset_path: None,
            eval_link_base: None,
        }
    }
}

impl InvestigateConfig {
    /// Creates a configuration rooted at `base_dir` with default values.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Loads a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the runs directory.
    pub fn with_runs_dir(mut self, runs_dir: impl Into<PathBuf>) -> Self {
        self.runs_dir = runs_dir.into();
        self
    }

    /// Sets the dataset file.
    pub fn with_dataset_path(mut self, dataset_path: impl Into<PathBuf>) -> Self {
        self.dataset_path = Some(dataset_path.into());
        self
    }

    /// Sets the evaluation link prefix.
    pub fn with_eval_link_base(mut self, eval_link_base: impl Into<String>) -> Self {
        self.eval_link_base = Some(eval_link_base.into());
        self
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir_name.is_empty() {
            return Err(ConfigError::Validation(
                "output_dir_name must not be empty".to_string(),
            ));
        }
        if self.output_dir_name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "output_dir_name must be a single directory name, got '{}'",
                self.output_dir_name
            )));
        }
        Ok(())
    }

    /// Directory that receives summary documents.
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output_dir_name)
    }

    /// Path of the summary document for an instance.
    pub fn summary_path(&self, instance_id: &str) -> PathBuf {
        self.output_dir().join(format!("{}.md", instance_id))
    }

    /// Resolved path of the open-repository script.
    pub fn open_repo_script_path(&self) -> PathBuf {
        self.resolve(&self.open_repo_script)
    }

    /// Resolved runs directory.
    pub fn runs_dir_path(&self) -> PathBuf {
        self.resolve(&self.runs_dir)
    }

    /// Resolved dataset path, if configured.
    pub fn dataset_file_path(&self) -> Option<PathBuf> {
        self.dataset_path.as_deref().map(|p| self.resolve(p))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
