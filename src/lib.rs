//! swe-investigate: per-instance investigation pages for SWE-bench runs.
//!
//! For each instance ID the tool gathers prediction logs, trajectories,
//! patches and evaluation output, then writes a Markdown summary linking them
//! next to the bug description.

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod instance;
pub mod shell;
pub mod summary;

// Re-export commonly used types
pub use batch::{run_batch, BatchOptions, BatchReport};
pub use config::InvestigateConfig;
pub use error::{ConfigError, FetchError, InstanceIdError, SummaryError};
pub use fetch::{ArtifactFetcher, LocalRunFetcher};
pub use shell::{CommandRunner, ProcessCommandRunner};
pub use summary::SummaryWriter;
