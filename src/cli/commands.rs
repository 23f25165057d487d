//! Command implementation for the CLI

use crate::{
    config::Config,
    core::{Refactorer, RunSummary},
};
use anyhow::Context;
use tracing::{info, instrument};

/// Printed to stdout once every file has been handled
pub const COMPLETION_MESSAGE: &str = "Done processing agent files.";

/// Rewrite the configured agent files and report completion
#[instrument(skip(config))]
pub fn execute(config: &Config) -> anyhow::Result<RunSummary> {
    info!(
        "Rewriting {} agent file(s) under: {}",
        config.files.len(),
        config.root_dir.display()
    );

    let refactorer = Refactorer::new(config).context("Failed to compile substitution rules")?;
    let summary = refactorer.run().context("Failed to rewrite agent files")?;

    println!("{COMPLETION_MESSAGE}");
    Ok(summary)
}
