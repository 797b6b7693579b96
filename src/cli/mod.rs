//! Command-line interface for swe-investigate.
//!
//! Parses instance IDs and flags, builds the configuration and runs the
//! summarization batch.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli};
