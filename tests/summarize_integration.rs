//! Integration tests for instance summarization.
//!
//! Drive the public API with a stub artifact source and a recording command
//! runner; no network or external processes are involved.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use swe_investigate::fetch::{ArtifactFetcher, FetchResult};
use swe_investigate::{
    run_batch, BatchOptions, CommandRunner, FetchError, InvestigateConfig, LocalRunFetcher,
    SummaryError, SummaryWriter,
};
use tempfile::TempDir;

/// Canned artifacts for one instance.
#[derive(Clone, Default)]
struct Canned {
    logs: Vec<PathBuf>,
    trajectories: Vec<PathBuf>,
    patches: Vec<PathBuf>,
    eval_folder: Option<String>,
    eval_logs: Vec<PathBuf>,
    markdown: String,
}

/// Serves canned artifacts; unknown instances fail like a lookup error.
#[derive(Default)]
struct StubFetcher {
    instances: HashMap<String, Canned>,
}

impl StubFetcher {
    fn with(mut self, instance_id: &str, canned: Canned) -> Self {
        self.instances.insert(instance_id.to_string(), canned);
        self
    }

    fn get(&self, instance_id: &str) -> FetchResult<&Canned> {
        self.instances
            .get(instance_id)
            .ok_or_else(|| FetchError::InstanceNotFound(instance_id.to_string()))
    }
}

#[async_trait]
impl ArtifactFetcher for StubFetcher {
    async fn download_prediction_log(&self, id: &str) -> FetchResult<Vec<PathBuf>> {
        Ok(self.get(id)?.logs.clone())
    }

    async fn download_prediction_trajectory(&self, id: &str) -> FetchResult<Vec<PathBuf>> {
        Ok(self.get(id)?.trajectories.clone())
    }

    async fn download_patch(&self, id: &str) -> FetchResult<Vec<PathBuf>> {
        Ok(self.get(id)?.patches.clone())
    }

    async fn download_eval_test_output(&self, id: &str) -> FetchResult<Vec<PathBuf>> {
        Ok(self.get(id)?.eval_logs.clone())
    }

    async fn get_eval_folder_link(&self, id: &str) -> FetchResult<Option<String>> {
        Ok(self.get(id)?.eval_folder.clone())
    }

    async fn get_instance_markdown(&self, id: &str) -> FetchResult<String> {
        Ok(self.get(id)?.markdown.clone())
    }
}

#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run_external_command(
        &self,
        _command: &Path,
        args: &[String],
    ) -> std::io::Result<Option<i32>> {
        self.calls.lock().unwrap().push(args.to_vec());
        Ok(Some(0))
    }
}

const ID: &str = "octocat__hello-world-42";

fn full_artifacts(root: &Path) -> Canned {
    let run = root.join("runs").join("default");
    Canned {
        logs: vec![run.join(format!("{ID}.log"))],
        trajectories: vec![run.join(format!("{ID}.traj"))],
        patches: vec![run.join("patches").join(format!("{ID}.patch"))],
        eval_folder: Some("https://evals.example.com/default/eval/octocat__hello-world-42".into()),
        eval_logs: vec![run.join("eval").join(ID).join("test_output.txt")],
        markdown: "Fixes off-by-one error.".to_string(),
    }
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_end_to_end_summary() {
    let dir = TempDir::new().unwrap();
    let config = InvestigateConfig::new(dir.path());
    let fetcher = StubFetcher::default().with(ID, full_artifacts(dir.path()));
    let runner = RecordingRunner::default();

    let report = run_batch(
        &config,
        &fetcher,
        &runner,
        &BatchOptions {
            instance_ids: ids(&[ID]),
            open_repo: false,
        },
    )
    .await
    .expect("batch should succeed");

    let path = dir.path().join("investigation-data").join(format!("{ID}.md"));
    assert_eq!(report.summaries, vec![path.clone()]);

    let doc = std::fs::read_to_string(&path).unwrap();
    assert!(doc.starts_with(&format!("# {ID}\n## Links")));
    assert!(doc.contains("[PR Link](https://github.com/octocat/hello-world/pull/42)"));
    assert_eq!(doc.matches("[Run Log](").count(), 1);
    assert!(doc.contains(&format!("[Run Log](../runs/default/{ID}.log)")));
    assert!(doc.contains(&format!("[Patch](../runs/default/patches/{ID}.patch)")));
    assert!(doc.contains("[Evaluation Results Folder](https://evals.example.com/"));

    let bug_data = doc.split("## Bug Data").nth(1).expect("Bug Data section");
    assert!(bug_data.lines().any(|line| line == "Fixes off-by-one error."));
}

#[tokio::test]
async fn test_empty_artifacts_render_placeholders() {
    let dir = TempDir::new().unwrap();
    let config = InvestigateConfig::new(dir.path());
    let fetcher = StubFetcher::default().with(
        ID,
        Canned {
            markdown: "bug".to_string(),
            ..Default::default()
        },
    );

    let path = SummaryWriter::new(&config, &fetcher)
        .summarize(ID)
        .await
        .unwrap();
    let doc = std::fs::read_to_string(path).unwrap();

    assert!(doc.contains("(no evaluation found)"));
    assert!(doc.contains("  * Eval Log: \n"));
    assert!(!doc.contains("[Patch]("));
}

#[tokio::test]
async fn test_summary_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let config = InvestigateConfig::new(dir.path());
    let fetcher = StubFetcher::default().with(ID, full_artifacts(dir.path()));
    let writer = SummaryWriter::new(&config, &fetcher);

    let path = writer.summarize(ID).await.unwrap();
    let first = std::fs::read(&path).unwrap();

    std::fs::write(&path, "stale content that must be replaced").unwrap();
    writer.summarize(ID).await.unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failed_fetch_leaves_earlier_summaries() {
    let dir = TempDir::new().unwrap();
    let config = InvestigateConfig::new(dir.path());
    let fetcher = StubFetcher::default().with(ID, full_artifacts(dir.path()));
    let runner = RecordingRunner::default();

    let result = run_batch(
        &config,
        &fetcher,
        &runner,
        &BatchOptions {
            instance_ids: ids(&[ID, "octocat__missing-7"]),
            open_repo: true,
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(SummaryError::Fetch(FetchError::InstanceNotFound(_)))
    ));
    assert!(config.summary_path(ID).exists());
    assert!(!config.summary_path("octocat__missing-7").exists());
    assert!(runner.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_open_repo_after_all_summaries() {
    let dir = TempDir::new().unwrap();
    let config = InvestigateConfig::new(dir.path());
    let fetcher = StubFetcher::default()
        .with(ID, full_artifacts(dir.path()))
        .with("a__b-1", Canned::default());
    let runner = RecordingRunner::default();

    let report = run_batch(
        &config,
        &fetcher,
        &runner,
        &BatchOptions {
            instance_ids: ids(&[ID, "a__b-1"]),
            open_repo: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(report.opened, 2);
    assert_eq!(
        *runner.calls.lock().unwrap(),
        vec![ids(&[ID]), ids(&["a__b-1"])]
    );
}

#[tokio::test]
async fn test_local_run_directory_end_to_end() {
    let dir = TempDir::new().unwrap();
    let run = dir.path().join("runs").join("swe-agent-gpt4");
    std::fs::create_dir_all(run.join("patches")).unwrap();
    std::fs::create_dir_all(run.join("eval").join(ID)).unwrap();
    std::fs::write(run.join(format!("{ID}.log")), "log").unwrap();
    std::fs::write(run.join(format!("{ID}.traj")), "{}").unwrap();
    std::fs::write(run.join("patches").join(format!("{ID}.patch")), "diff").unwrap();
    std::fs::write(run.join("eval").join(ID).join("test_output.txt"), "ok").unwrap();

    let dataset = dir.path().join("lite.jsonl");
    std::fs::write(
        &dataset,
        format!(
            "{{\"instance_id\":\"{ID}\",\"repo\":\"octocat/hello-world\",\"problem_statement\":\"Fixes off-by-one error.\"}}\n"
        ),
    )
    .unwrap();

    let config = InvestigateConfig::new(dir.path()).with_dataset_path("lite.jsonl");
    let fetcher = LocalRunFetcher::from_config(&config).await.unwrap();

    let path = SummaryWriter::new(&config, &fetcher)
        .summarize(ID)
        .await
        .unwrap();
    let doc = std::fs::read_to_string(path).unwrap();

    assert!(doc.contains(&format!("[Run Log](../runs/swe-agent-gpt4/{ID}.log)")));
    assert!(doc.contains(&format!("[Traj](../runs/swe-agent-gpt4/{ID}.traj)")));
    assert!(doc.contains(&format!(
        "[Eval Log](../runs/swe-agent-gpt4/eval/{ID}/test_output.txt)"
    )));
    assert!(doc.contains(&format!(
        "[Evaluation Results Folder](../runs/swe-agent-gpt4/eval/{ID})"
    )));
    assert!(config
        .output_dir()
        .join(format!("../runs/swe-agent-gpt4/eval/{ID}"))
        .is_dir());
    assert!(doc.contains("* Repo: `octocat/hello-world`"));
    assert!(doc.contains("Fixes off-by-one error."));
}
