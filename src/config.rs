//! Configuration for a refactor run
//!
//! The file list and the model replacement are built in; only the root
//! directory and logging verbosity come from the command line.

use crate::{
    cli::Args,
    core::{rules::DEFAULT_MODEL_REPLACEMENT, targets::AGENT_FILES},
    error::RefactorError,
    utils::fs::FileSystemUtils,
};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Directory the file list is resolved against
    pub root_dir: PathBuf,
    /// Files to rewrite, relative to `root_dir`
    pub files: Vec<PathBuf>,
    /// Literal written as the value of every `model` field
    pub model_replacement: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            root_dir: PathBuf::from("."),
            files: AGENT_FILES.iter().map(PathBuf::from).collect(),
            model_replacement: DEFAULT_MODEL_REPLACEMENT.to_string(),
        }
    }
}

impl Config {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self, RefactorError> {
        let config = Self {
            debug: args.debug,
            root_dir: args.root.clone(),
            ..Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), RefactorError> {
        if !FileSystemUtils::new().is_dir(&self.root_dir) {
            return Err(RefactorError::validation(format!(
                "Root directory not found: {}",
                self.root_dir.display()
            )));
        }

        Ok(())
    }
}
