//! Project configuration loader describing the target Xcode project.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::models::CandidateFile;

const DEFAULT_CONFIG_FILE: &str = "pbxsync.config.json";

/// Relative path from the user's home directory to the derived-data caches.
const DERIVED_DATA_RELATIVE: &str = "Library/Developer/Xcode/DerivedData";

/// Discoverable project configuration describing the project layout and build parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory containing the `.xcodeproj` bundle and the source tree.
    pub project_dir: String,
    /// Project name, used for the `.xcodeproj` bundle and cache matching.
    pub project_name: String,
    /// Source files that should be registered in the manifest.
    pub candidates: Vec<CandidateFile>,
    /// Build scheme passed to the build tool.
    pub scheme: String,
    /// Simulator destination passed to the build tool.
    pub destination: String,
    /// Derived-data cache directory; resolved under the user's home when absent.
    pub derived_data_dir: Option<PathBuf>,
    /// Number of trailing build output lines echoed to the console.
    pub build_output_tail: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project_dir: "Redi".into(),
            project_name: "Redi".into(),
            candidates: vec![
                CandidateFile::new("V5/Config/V5Config.swift", "V5Config.swift"),
                CandidateFile::new("V5/Services/V5AudioService.swift", "V5AudioService.swift"),
                CandidateFile::new(
                    "V5/Services/V5WebSocketService.swift",
                    "V5WebSocketService.swift",
                ),
                CandidateFile::new("V5/Views/V5MainView.swift", "V5MainView.swift"),
            ],
            scheme: "Redi".into(),
            destination: "platform=iOS Simulator,name=iPhone 16".into(),
            derived_data_dir: None,
            build_output_tail: 30,
        }
    }
}

impl ProjectConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// When the configuration file does not exist or fails to parse we fall back to the
    /// built-in defaults so the tool keeps working against the original project layout.
    pub fn discover(working_dir: &Path) -> Self {
        let candidate = working_dir.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Path to the `.xcodeproj` bundle passed to the build tool.
    pub fn xcodeproj_path(&self) -> PathBuf {
        Path::new(&self.project_dir).join(format!("{}.xcodeproj", self.project_name))
    }

    /// Path to the `project.pbxproj` manifest inside the project bundle.
    pub fn pbxproj_path(&self) -> PathBuf {
        self.xcodeproj_path().join("project.pbxproj")
    }

    /// Absolute on-disk location of a candidate source file.
    pub fn candidate_source_path(&self, candidate: &CandidateFile) -> PathBuf {
        Path::new(&self.project_dir).join(&candidate.path)
    }

    /// Resolve the derived-data cache directory, preferring the configured override.
    ///
    /// Returns `None` when no override is set and the home directory cannot be determined.
    pub fn derived_data_path(&self) -> Option<PathBuf> {
        self.derived_data_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(DERIVED_DATA_RELATIVE)))
    }
}
