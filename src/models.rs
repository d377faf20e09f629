//! Data structures describing patch candidates and run outcomes.

use std::path::PathBuf;

use serde::Deserialize;

/// A source file that should be tracked by the project manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CandidateFile {
    /// Path of the source file relative to the project directory.
    pub path: String,
    /// Display name as it appears in manifest records and comments.
    pub name: String,
}

impl CandidateFile {
    /// Build a candidate from a relative path and display name.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Result of examining a single candidate against the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// The candidate was inserted into the manifest.
    Registered,
    /// The display name already appears somewhere in the manifest text.
    AlreadyRegistered,
    /// The source file does not exist on disk; nothing was inserted.
    MissingFromDisk,
}

/// Aggregate outcome of one patch run over the candidate list.
#[derive(Debug)]
pub struct PatchSummary {
    /// Per-candidate outcomes in candidate-list order.
    pub outcomes: Vec<(CandidateFile, CandidateOutcome)>,
    /// Number of candidates inserted into the manifest.
    pub files_added: usize,
    /// Whether the manifest file was rewritten on disk.
    pub rewritten: bool,
    /// Path of the backup copy created before any mutation.
    pub backup_path: PathBuf,
}

impl PatchSummary {
    /// Outcome recorded for the given display name, if the candidate was examined.
    pub fn outcome_for(&self, name: &str) -> Option<CandidateOutcome> {
        self.outcomes
            .iter()
            .find(|(candidate, _)| candidate.name == name)
            .map(|(_, outcome)| *outcome)
    }
}
