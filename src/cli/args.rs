//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Refactor Agents - strip publisher fields and pin the model in agent definitions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "refactor-agents")]
pub struct Args {
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Directory the agent file list is resolved against
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
