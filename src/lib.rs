//! # Agent Refactor
//!
//! One-shot rewrite of a fixed set of TypeScript agent definition files.
//! Each file present on disk is read, passed through an ordered list of
//! substitution rules and written back in place:
//!
//! - the `publisher` import and every `publisher` field are removed
//! - every `model` field is pinned to `'deepseek-coder'`
//! - every `reasoningOptions` object field is removed
//!
//! Missing files are skipped. The first read or write failure aborts the run.
//!
//! ## Example
//!
//! ```
//! use agent_refactor::core::{RuleSet, rules::DEFAULT_MODEL_REPLACEMENT};
//!
//! let rules = RuleSet::new(DEFAULT_MODEL_REPLACEMENT)?;
//! let out = rules.apply("  publisher,\n  model: \"gpt-4\",\n");
//! assert_eq!(out.text, "  model: 'deepseek-coder',\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity.
///
/// Logs go to stderr; stdout only carries the completion message.
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
