//! Core functionality for rewriting agent definitions
//!
//! Contains the embedded file list, the ordered substitution rules and the
//! runner that applies them file by file.

pub mod refactor;
pub mod rules;
pub mod targets;

pub use refactor::{AgentFile, Refactorer, RunSummary};
pub use rules::{RuleSet, SubstitutionRule, Transformed};
pub use targets::{Target, TargetSet, AGENT_FILES};
