//! CLI definition for swe-investigate.
//!
//! Summarizes one or more SWE-bench instances into Markdown pages and can
//! open each instance's repository afterwards.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::batch::{run_batch, BatchOptions};
use crate::config::InvestigateConfig;
use crate::fetch::LocalRunFetcher;
use crate::shell::ProcessCommandRunner;

/// Summarize SWE-bench instances.
#[derive(Parser, Debug)]
#[command(name = "swe-investigate")]
#[command(about = "Summarize SWE-bench instances")]
#[command(version)]
#[command(
    long_about = "swe-investigate collects run logs, trajectories, patches and evaluation output for SWE-bench instances and writes one Markdown summary per instance to <base-dir>/investigation-data/<instance_id>.md.\n\nExample usage:\n  swe-investigate django__django-12345 sympy__sympy-20590 --open-repo"
)]
pub struct Cli {
    /// Instance IDs from the dataset (e.g. django__django-12345).
    #[arg(required = true, num_args = 1..)]
    pub instance_ids: Vec<String>,

    /// Open the repository of each instance after summarizing.
    #[arg(short = 'o', long)]
    pub open_repo: bool,

    /// YAML configuration file.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Base directory for output, runs and the open-repo script.
    #[arg(long, env = "SWE_INVESTIGATE_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Directory containing one subdirectory per evaluated run.
    #[arg(long, env = "SWE_INVESTIGATE_RUNS_DIR")]
    pub runs_dir: Option<PathBuf>,

    /// SWE-bench dataset file (JSON array or JSON Lines) for bug data.
    #[arg(long, env = "SWE_INVESTIGATE_DATASET")]
    pub dataset: Option<PathBuf>,

    /// URL prefix for evaluation folder links.
    #[arg(long)]
    pub eval_link_base: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Builds the effective configuration: config file first, flags on top.
    pub fn resolve_config(&self) -> anyhow::Result<InvestigateConfig> {
        let mut config = match &self.config {
            Some(path) => InvestigateConfig::from_yaml_file(path).map_err(|e| {
                anyhow::anyhow!("Failed to load config {}: {}", path.display(), e)
            })?,
            None => InvestigateConfig::default(),
        };

        if let Some(base_dir) = &self.base_dir {
            config.base_dir = base_dir.clone();
        }
        if let Some(runs_dir) = &self.runs_dir {
            config.runs_dir = runs_dir.clone();
        }
        if let Some(dataset) = &self.dataset {
            config.dataset_path = Some(dataset.clone());
        }
        if let Some(eval_link_base) = &self.eval_link_base {
            config.eval_link_base = Some(eval_link_base.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse CLI arguments and return the Cli struct.
///
/// This allows main.rs to access CLI arguments (like log_level) before running commands.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;
    info!(
        base_dir = %config.base_dir.display(),
        output_dir = %config.output_dir().display(),
        instances = cli.instance_ids.len(),
        "Starting instance summarization"
    );

    let fetcher = LocalRunFetcher::from_config(&config).await?;
    let runner = ProcessCommandRunner::new();
    let options = BatchOptions {
        instance_ids: cli.instance_ids,
        open_repo: cli.open_repo,
    };

    run_batch(&config, &fetcher, &runner, &options).await?;
    Ok(())
}
