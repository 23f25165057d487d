//! Sequential read, transform and write over the target set
//!
//! Each file is read, rewritten in memory and written back before the next
//! one is looked at. The first I/O failure ends the run; files already
//! rewritten stay rewritten.

use crate::{
    config::Config,
    core::{
        rules::{RuleSet, Transformed},
        targets::{Target, TargetSet},
    },
    error::{RefactorError, Result},
    utils::fs::FileSystemUtils,
};
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// A file's path and its full text, held for one read-transform-write cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentFile {
    pub path: PathBuf,
    pub content: String,
}

impl AgentFile {
    /// Read a file from disk
    pub fn read(path: impl Into<PathBuf>, fs_utils: &FileSystemUtils) -> Result<Self> {
        let path = path.into();
        let content = fs_utils
            .read_file_to_string(&path)
            .map_err(|e| RefactorError::file_system("read", &path, e))?;
        Ok(Self { path, content })
    }

    /// Run the rule set over the content
    pub fn transform(&mut self, rules: &RuleSet) -> Transformed {
        let outcome = rules.apply(&self.content);
        self.content.clone_from(&outcome.text);
        outcome
    }

    /// Overwrite the file on disk with the current content
    pub fn write(&self, fs_utils: &FileSystemUtils) -> Result<()> {
        fs_utils
            .overwrite_file(&self.path, &self.content)
            .map_err(|e| RefactorError::file_system("write", &self.path, e))
    }
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files read and written back
    pub processed: usize,
    /// Files not present on disk
    pub skipped: usize,
    /// Processed files whose content changed
    pub changed: usize,
}

/// Rewrites every present file of the target set
pub struct Refactorer {
    targets: TargetSet,
    rules: RuleSet,
    fs_utils: FileSystemUtils,
}

impl Refactorer {
    /// Create a refactorer for the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        let rules = RuleSet::new(&config.model_replacement)?;
        debug!("Compiled rules: {:?}", rules.names());

        Ok(Self {
            targets: TargetSet::new(config.root_dir.clone(), config.files.clone()),
            rules,
            fs_utils: FileSystemUtils::new(),
        })
    }

    /// Process every target in order
    #[instrument(skip(self), fields(root = %self.targets.root().display()))]
    pub fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for target in self.targets.iter() {
            if !target.exists() {
                debug!("Skipping missing file: {}", target.relative.display());
                summary.skipped += 1;
                continue;
            }

            if self.process(&target)? {
                summary.changed += 1;
            }
            summary.processed += 1;
        }

        info!(
            "Processed {} file(s), {} changed, {} missing",
            summary.processed, summary.changed, summary.skipped
        );
        Ok(summary)
    }

    /// Rewrite one file, returning whether its content changed
    fn process(&self, target: &Target) -> Result<bool> {
        let mut file = AgentFile::read(&target.path, &self.fs_utils)?;
        let outcome = file.transform(&self.rules);
        file.write(&self.fs_utils)?;

        debug!(
            "{}: {} match(es), {}",
            target.relative.display(),
            outcome.total_matches(),
            if outcome.changed { "rewritten" } else { "unchanged" }
        );
        Ok(outcome.changed)
    }
}
