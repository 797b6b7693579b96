//! Markdown summary documents.
//!
//! A summary collects every artifact found for one instance into a single
//! page under the investigation output directory. Links to local artifacts
//! are written relative to that directory so they resolve from the document.

use std::path::{Path, PathBuf};

use tera::{Context, Tera};
use tracing::{debug, info};

use crate::config::InvestigateConfig;
use crate::error::SummaryError;
use crate::fetch::ArtifactFetcher;
use crate::instance::{bug_link, relative_link};

/// Placeholder for instances without an evaluation folder.
pub const NO_EVALUATION_FOUND: &str = "(no evaluation found)";

/// Layout of a summary document.
const SUMMARY_TEMPLATE: &str = r#"
# {{ instance_id }}
## Links

* [PR Link]({{ bug_link }})
* Prediction
  * Run Logs: {{ run_logs }}
  * Traj Json: {{ trajectories }}
  * {{ patches }}
* Evaluation
  * {{ eval_folder }}
  * Eval Log: {{ eval_logs }}

## Bug Data

{{ bug_data }}

"#;

/// Everything that goes into one summary document.
#[derive(Debug, Clone, Default)]
pub struct SummaryInput {
    pub instance_id: String,
    pub bug_link: String,
    pub prediction_logs: Vec<PathBuf>,
    pub trajectories: Vec<PathBuf>,
    pub patches: Vec<PathBuf>,
    pub eval_folder_link: Option<String>,
    pub eval_logs: Vec<PathBuf>,
    pub bug_markdown: String,
}

/// Renders and writes summary documents.
pub struct SummaryWriter<'a> {
    config: &'a InvestigateConfig,
    fetcher: &'a dyn ArtifactFetcher,
}

impl<'a> SummaryWriter<'a> {
    /// Creates a writer that stores documents under `config.output_dir()`.
    pub fn new(config: &'a InvestigateConfig, fetcher: &'a dyn ArtifactFetcher) -> Self {
        Self { config, fetcher }
    }

    /// Fetches all artifacts for an instance.
    pub async fn collect(&self, instance_id: &str) -> Result<SummaryInput, SummaryError> {
        let bug_link = bug_link(instance_id)?;

        let prediction_logs = self.fetcher.download_prediction_log(instance_id).await?;
        let trajectories = self
            .fetcher
            .download_prediction_trajectory(instance_id)
            .await?;
        let patches = self.fetcher.download_patch(instance_id).await?;
        let eval_folder_link = self.fetcher.get_eval_folder_link(instance_id).await?;
        let eval_logs = self.fetcher.download_eval_test_output(instance_id).await?;
        let bug_markdown = self.fetcher.get_instance_markdown(instance_id).await?;

        debug!(
            instance_id,
            logs = prediction_logs.len(),
            trajectories = trajectories.len(),
            patches = patches.len(),
            eval_logs = eval_logs.len(),
            has_eval_folder = eval_folder_link.is_some(),
            "Fetched instance artifacts"
        );

        Ok(SummaryInput {
            instance_id: instance_id.to_string(),
            bug_link,
            prediction_logs,
            trajectories,
            patches,
            eval_folder_link,
            eval_logs,
            bug_markdown,
        })
    }

    /// Renders the document text for already collected artifacts.
    pub fn render(&self, input: &SummaryInput) -> Result<String, SummaryError> {
        let base_dir = self.config.output_dir();

        let eval_folder = match &input.eval_folder_link {
            Some(href) => format!("[Evaluation Results Folder]({})", href),
            None => NO_EVALUATION_FOUND.to_string(),
        };

        let mut context = Context::new();
        context.insert("instance_id", &input.instance_id);
        context.insert("bug_link", &input.bug_link);
        context.insert("run_logs", &link_list("Run Log", &input.prediction_logs, &base_dir));
        context.insert("trajectories", &link_list("Traj", &input.trajectories, &base_dir));
        context.insert("patches", &link_list("Patch", &input.patches, &base_dir));
        context.insert("eval_folder", &eval_folder);
        context.insert("eval_logs", &link_list("Eval Log", &input.eval_logs, &base_dir));
        context.insert("bug_data", &input.bug_markdown);

        let rendered = Tera::one_off(SUMMARY_TEMPLATE, &context, false)?;
        Ok(rendered.trim().to_string())
    }

    /// Fetches, renders and writes the summary for one instance.
    ///
    /// The document is fully rendered before the file is touched; an existing
    /// summary is overwritten.
    pub async fn summarize(&self, instance_id: &str) -> Result<PathBuf, SummaryError> {
        println!("Summarizing Instance {}...", instance_id);

        let input = self.collect(instance_id).await?;
        let contents = self.render(&input)?;

        let summary_path = self.config.summary_path(instance_id);
        if let Some(parent) = summary_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&summary_path, contents).await?;

        info!(instance_id, path = %summary_path.display(), "Wrote instance summary");
        println!("  Done: {}", summary_path.display());
        Ok(summary_path)
    }
}

/// `[label](rel), [label](rel)` for each path, relative to `base_dir`.
fn link_list(label: &str, paths: &[PathBuf], base_dir: &Path) -> String {
    paths
        .iter()
        .map(|path| format!("[{}]({})", label, relative_link(path, base_dir)))
        .collect::<Vec<_>>()
        .join(", ")
}
