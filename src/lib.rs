#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod derived_data;
pub mod models;
pub mod patcher;
pub mod pbxproj;
pub mod xcodebuild;

pub use config::ProjectConfig;
pub use models::{CandidateFile, CandidateOutcome, PatchSummary};
pub use patcher::ProjectPatcher;
pub use xcodebuild::BuildReport;
