//! Sequential summarization of a list of instances.
//!
//! Instances are processed one at a time in input order. The first failure
//! aborts the batch: summaries already written stay on disk and the remaining
//! instances are never attempted. Opening repositories happens only after
//! every summary succeeded, and its failures never fail the batch.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::InvestigateConfig;
use crate::error::SummaryError;
use crate::fetch::ArtifactFetcher;
use crate::shell::CommandRunner;
use crate::summary::SummaryWriter;

/// Options for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Instance IDs in processing order.
    pub instance_ids: Vec<String>,
    /// Invoke the open-repository script for each instance afterwards.
    pub open_repo: bool,
}

/// Outcome of a completed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Summary documents written, in input order.
    pub summaries: Vec<PathBuf>,
    /// Number of open-repository invocations made.
    pub opened: usize,
}

/// Summarizes every instance, then optionally opens each repository.
pub async fn run_batch(
    config: &InvestigateConfig,
    fetcher: &dyn ArtifactFetcher,
    runner: &dyn CommandRunner,
    options: &BatchOptions,
) -> Result<BatchReport, SummaryError> {
    let writer = SummaryWriter::new(config, fetcher);
    let total = options.instance_ids.len();

    tokio::fs::create_dir_all(config.output_dir()).await?;

    let mut report = BatchReport::default();
    for (i, instance_id) in options.instance_ids.iter().enumerate() {
        println!("Summarizing {}/{}: {}", i + 1, total, instance_id);
        report.summaries.push(writer.summarize(instance_id).await?);
    }
    info!(count = report.summaries.len(), "Summarized all instances");

    if options.open_repo {
        println!("Opening repo(s)...");
        let script = config.open_repo_script_path();
        for instance_id in &options.instance_ids {
            let args = [instance_id.clone()];
            match runner.run_external_command(&script, &args).await {
                Ok(code) => debug!(instance_id, ?code, "Open-repo command finished"),
                Err(e) => debug!(instance_id, error = %e, "Open-repo command failed to start"),
            }
            report.opened += 1;
        }
    }

    Ok(report)
}
