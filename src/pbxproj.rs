//! Text insertions applied to the `project.pbxproj` manifest.
//!
//! The manifest is never parsed. Each record is spliced in next to a section
//! marker that Xcode writes into every project file, so the insertions only
//! work on manifests that still carry those markers. A pattern that fails to
//! match leaves the text unchanged.

use regex::{Captures, Regex};
use uuid::Uuid;

use crate::models::CandidateFile;

/// Length of the hexadecimal reference identifiers used by the manifest format.
pub const REFERENCE_ID_LEN: usize = 24;

/// Generate a manifest reference identifier: 24 uppercase hexadecimal characters.
///
/// Uniqueness within the manifest is probabilistic, never checked.
pub fn generate_reference_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..REFERENCE_ID_LEN].to_uppercase()
}

/// Identifier pair minted for one registered source file.
#[derive(Debug, Clone)]
pub struct ReferenceIds {
    /// Identifier of the `PBXFileReference` record.
    pub file_ref: String,
    /// Identifier of the `PBXBuildFile` record.
    pub build_file: String,
}

impl ReferenceIds {
    /// Mint a fresh identifier pair.
    pub fn generate() -> Self {
        Self {
            file_ref: generate_reference_id(),
            build_file: generate_reference_id(),
        }
    }
}

/// Register a candidate in all three manifest sections, returning the updated text.
///
/// Inserts a file-reference record, a build-file record, and a `Sources`
/// build-phase entry keyed by a freshly generated identifier pair.
pub fn register_source_file(content: &str, candidate: &CandidateFile) -> String {
    register_with_ids(content, candidate, &ReferenceIds::generate())
}

/// Register a candidate using caller-supplied identifiers.
pub fn register_with_ids(content: &str, candidate: &CandidateFile, ids: &ReferenceIds) -> String {
    let text = insert_file_reference(content, candidate, &ids.file_ref);
    let text = insert_build_file(&text, candidate, ids);
    insert_sources_entry(&text, candidate, &ids.build_file)
}

/// Whether the manifest already mentions the candidate's display name.
///
/// A plain substring check: a name appearing in a comment counts as
/// registered, and the check never inspects record structure.
pub fn is_registered(content: &str, candidate: &CandidateFile) -> bool {
    content.contains(&candidate.name)
}

fn insert_file_reference(content: &str, candidate: &CandidateFile, file_ref_id: &str) -> String {
    let record = format!(
        "\t\t{id} /* {name} */ = {{isa = PBXFileReference; lastKnownFileType = sourcecode.swift; path = {path}; sourceTree = \"<group>\"; }};\n",
        id = file_ref_id,
        name = candidate.name,
        path = candidate.path,
    );
    let pattern =
        Regex::new(r"(/\* End PBXFileReference section \*/)").expect("invalid file reference regex");
    pattern
        .replace(content, |caps: &Captures| format!("{record}{}", &caps[1]))
        .into_owned()
}

fn insert_build_file(content: &str, candidate: &CandidateFile, ids: &ReferenceIds) -> String {
    let record = format!(
        "\t\t{build} /* {name} in Sources */ = {{isa = PBXBuildFile; fileRef = {file_ref} /* {name} */; }};\n",
        build = ids.build_file,
        file_ref = ids.file_ref,
        name = candidate.name,
    );
    let pattern =
        Regex::new(r"(/\* End PBXBuildFile section \*/)").expect("invalid build file regex");
    pattern
        .replace(content, |caps: &Captures| format!("{record}{}", &caps[1]))
        .into_owned()
}

fn insert_sources_entry(content: &str, candidate: &CandidateFile, build_file_id: &str) -> String {
    let entry = format!("\t\t\t\t{build_file_id} /* {} in Sources */,", candidate.name);
    // The block match stops at the first `}`, so only a Sources phase whose
    // `files` list opens before any nested closing brace is recognized.
    let pattern = Regex::new(r"(/\* Sources \*/ = \{[^}]*files = \()([^)]*)")
        .expect("invalid sources phase regex");
    pattern
        .replace(content, |caps: &Captures| {
            format!("{}{}\n{entry}", &caps[1], &caps[2])
        })
        .into_owned()
}
