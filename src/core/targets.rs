//! The fixed set of agent definition files to rewrite

use std::path::{Path, PathBuf};

/// Agent definition files, relative to the repository root, in processing order
pub const AGENT_FILES: &[&str] = &[
    "agents/base2/base2-max.ts",
    "agents/base2/base2-evals.ts",
    "agents/base2/base2-free.ts",
    "agents/base2/base2-max-evals.ts",
    "agents/base2/base2-fast.ts",
    "agents/base2/base2-fast-no-validation.ts",
    "agents/base2/base2.ts",
    "agents/base2/base2-plan.ts",
    "agents/file-explorer/file-lister.ts",
    "agents/file-explorer/directory-lister.ts",
    "agents/file-explorer/glob-matcher.ts",
    "agents/file-explorer/file-picker.ts",
    "agents/file-explorer/code-searcher.ts",
    "agents/file-explorer/file-picker-max.ts",
    "agents/editor/best-of-n/editor-implementor-gpt-5.ts",
    "agents/editor/best-of-n/editor-implementor.ts",
    "agents/editor/best-of-n/editor-implementor-opus.ts",
    "agents/editor/best-of-n/editor-multi-prompt.ts",
    "agents/editor/best-of-n/best-of-n-selector2.ts",
    "agents/editor/editor-gpt-5.ts",
    "agents/editor/editor.ts",
    "agents/editor/editor-glm.ts",
    "agents/general-agent/general-agent.ts",
    "agents/general-agent/gpt-5-agent.ts",
    "agents/general-agent/opus-agent.ts",
    "agents/researcher/researcher-web.ts",
    "agents/researcher/researcher-docs.ts",
    "agents/commander.ts",
    "agents/commander-lite.ts",
    "agents/reviewer/multi-prompt/code-reviewer-multi-prompt.ts",
    "agents/reviewer/code-reviewer.ts",
    "agents/thinker/best-of-n/thinker-best-of-n-opus.ts",
    "agents/thinker/best-of-n/thinker-selector.ts",
    "agents/thinker/best-of-n/thinker-best-of-n.ts",
    "agents/thinker/best-of-n/thinker-selector-opus.ts",
    "agents/thinker/thinker.ts",
    "agents/context-pruner.ts",
];

/// One file of the target set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Path as listed
    pub relative: PathBuf,
    /// Path resolved against the root directory
    pub path: PathBuf,
}

impl Target {
    /// Whether the file is present on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Ordered list of files resolved against a root directory.
///
/// No globbing, recursion or deduplication happens here: the list is
/// walked exactly as given.
#[derive(Debug, Clone)]
pub struct TargetSet {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl TargetSet {
    /// Create a target set from an explicit list
    pub fn new(root: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    /// Root directory the list is resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Iterate over the targets in declared order
    pub fn iter(&self) -> impl Iterator<Item = Target> + '_ {
        self.files.iter().map(|relative| Target {
            relative: relative.clone(),
            path: self.root.join(relative),
        })
    }
}
