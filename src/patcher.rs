//! Manifest patch orchestration: read, back up, insert, write back.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::config::ProjectConfig;
use crate::models::{CandidateOutcome, PatchSummary};
use crate::pbxproj;

/// Ensures the configured candidate files are referenced by the project manifest.
///
/// The manifest text is read once, mutated in memory, and only written back
/// when at least one candidate was inserted. A `.backup` sibling copy is
/// created before any mutation regardless of whether changes follow.
pub struct ProjectPatcher<'a> {
    config: &'a ProjectConfig,
}

impl<'a> ProjectPatcher<'a> {
    /// Create a patcher for the provided configuration.
    pub fn new(config: &'a ProjectConfig) -> Self {
        Self { config }
    }

    /// Run the check-and-insert pass over every configured candidate.
    ///
    /// Fails when the manifest does not exist or when filesystem operations on
    /// it fail; a candidate missing from disk is an outcome, not an error.
    pub fn patch(&self) -> Result<PatchSummary> {
        let manifest_path = self.config.pbxproj_path();
        if !manifest_path.exists() {
            return Err(anyhow!("cannot find {}", manifest_path.display()));
        }

        let mut text = fs::read_to_string(&manifest_path)
            .with_context(|| format!("failed to read {}", manifest_path.display()))?;

        let backup_path = backup_path_for(&manifest_path);
        fs::copy(&manifest_path, &backup_path)
            .with_context(|| format!("failed to write backup {}", backup_path.display()))?;

        let mut outcomes = Vec::with_capacity(self.config.candidates.len());
        let mut files_added = 0;
        for candidate in &self.config.candidates {
            let source_path = self.config.candidate_source_path(candidate);
            let outcome = if !source_path.exists() {
                CandidateOutcome::MissingFromDisk
            } else if pbxproj::is_registered(&text, candidate) {
                CandidateOutcome::AlreadyRegistered
            } else {
                text = pbxproj::register_source_file(&text, candidate);
                files_added += 1;
                CandidateOutcome::Registered
            };
            outcomes.push((candidate.clone(), outcome));
        }

        let rewritten = files_added > 0;
        if rewritten {
            fs::write(&manifest_path, &text)
                .with_context(|| format!("failed to write {}", manifest_path.display()))?;
        }

        Ok(PatchSummary {
            outcomes,
            files_added,
            rewritten,
            backup_path,
        })
    }
}

/// Sibling backup path for a manifest: the same file name with `.backup` appended.
fn backup_path_for(manifest_path: &Path) -> PathBuf {
    let mut backup = manifest_path.as_os_str().to_os_string();
    backup.push(".backup");
    PathBuf::from(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidateFile;
    use tempfile::{TempDir, tempdir};

    const EMPTY_MANIFEST: &str = "\
// !$*UTF8*$!
{
\tobjects = {
/* Begin PBXBuildFile section */
/* End PBXBuildFile section */
/* Begin PBXFileReference section */
/* End PBXFileReference section */
\t\t0AB1C2D3E4F5061728394A5B /* Sources */ = {
\t\t\tisa = PBXSourcesBuildPhase;
\t\t\tbuildActionMask = 2147483647;
\t\t\tfiles = (
\t\t\t);
\t\t\trunOnlyForDeploymentPostprocessing = 0;
\t\t};
\t};
}
";

    /// Lay out a project checkout with the manifest and one on-disk source file.
    fn project_fixture() -> (TempDir, ProjectConfig) {
        let temp = tempdir().expect("failed to create temp dir");
        let project_dir = temp.path().join("Redi");

        let bundle = project_dir.join("Redi.xcodeproj");
        fs::create_dir_all(&bundle).expect("failed to create project bundle");
        fs::write(bundle.join("project.pbxproj"), EMPTY_MANIFEST)
            .expect("failed to write manifest");

        let config_dir = project_dir.join("V5/Config");
        fs::create_dir_all(&config_dir).expect("failed to create source dir");
        fs::write(config_dir.join("V5Config.swift"), "struct V5Config {}\n")
            .expect("failed to write source file");

        let config = ProjectConfig {
            project_dir: project_dir.to_string_lossy().into_owned(),
            candidates: vec![
                CandidateFile::new("V5/Config/V5Config.swift", "V5Config.swift"),
                CandidateFile::new("V5/Views/V5MainView.swift", "V5MainView.swift"),
            ],
            ..ProjectConfig::default()
        };
        (temp, config)
    }

    #[test]
    fn inserts_present_candidates_and_skips_missing_ones() {
        let (_temp, config) = project_fixture();

        let summary = ProjectPatcher::new(&config).patch().expect("patch failed");

        assert_eq!(summary.files_added, 1);
        assert!(summary.rewritten);
        assert_eq!(
            summary.outcome_for("V5Config.swift"),
            Some(CandidateOutcome::Registered)
        );
        assert_eq!(
            summary.outcome_for("V5MainView.swift"),
            Some(CandidateOutcome::MissingFromDisk)
        );

        let patched = fs::read_to_string(config.pbxproj_path()).unwrap();
        assert_eq!(patched.matches("isa = PBXFileReference").count(), 1);
        assert_eq!(patched.matches("isa = PBXBuildFile").count(), 1);
        assert_eq!(patched.matches("V5Config.swift in Sources").count(), 2);
        assert!(!patched.contains("V5MainView.swift"));
    }

    #[test]
    fn second_run_is_idempotent() {
        let (_temp, config) = project_fixture();
        let patcher = ProjectPatcher::new(&config);

        patcher.patch().expect("first patch failed");
        let after_first = fs::read_to_string(config.pbxproj_path()).unwrap();

        let summary = patcher.patch().expect("second patch failed");

        assert_eq!(summary.files_added, 0);
        assert!(!summary.rewritten);
        assert_eq!(
            summary.outcome_for("V5Config.swift"),
            Some(CandidateOutcome::AlreadyRegistered)
        );
        assert_eq!(
            fs::read_to_string(config.pbxproj_path()).unwrap(),
            after_first
        );
    }

    #[test]
    fn backup_preserves_the_pre_run_manifest() {
        let (_temp, config) = project_fixture();

        let summary = ProjectPatcher::new(&config).patch().expect("patch failed");

        let backup = fs::read_to_string(&summary.backup_path).unwrap();
        assert_eq!(backup, EMPTY_MANIFEST);

        let patched = fs::read_to_string(config.pbxproj_path()).unwrap();
        assert_ne!(patched, backup);
    }

    #[test]
    fn write_back_is_skipped_when_nothing_changed() {
        let (_temp, config) = project_fixture();
        let manifest_path = config.pbxproj_path();
        let registered = EMPTY_MANIFEST.replace(
            "/* End PBXFileReference section */",
            "\t\tAAAAAAAAAAAAAAAAAAAAAAAA /* V5Config.swift */ = {isa = PBXFileReference; };\n/* End PBXFileReference section */",
        );
        fs::write(&manifest_path, &registered).unwrap();

        let summary = ProjectPatcher::new(&config).patch().expect("patch failed");

        assert!(!summary.rewritten);
        assert_eq!(fs::read_to_string(&manifest_path).unwrap(), registered);
        // The backup is still taken before the no-op pass.
        assert_eq!(fs::read_to_string(&summary.backup_path).unwrap(), registered);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let temp = tempdir().expect("failed to create temp dir");
        let config = ProjectConfig {
            project_dir: temp.path().join("Absent").to_string_lossy().into_owned(),
            ..ProjectConfig::default()
        };

        let err = ProjectPatcher::new(&config).patch().unwrap_err();
        assert!(err.to_string().contains("cannot find"));
    }
}
