//! Build invocation via `xcodebuild`, with captured output and tail reporting.

use std::process::Command;

use anyhow::{Context, Result};

use crate::config::ProjectConfig;

/// Exit code reported when the subprocess was terminated without one.
const SIGNALLED_EXIT_CODE: i32 = 1;

/// Outcome of a build subprocess invocation.
#[derive(Debug)]
pub struct BuildReport {
    /// Exit code of the build subprocess.
    pub exit_code: i32,
    /// Combined stdout and stderr of the subprocess.
    pub output: String,
}

impl BuildReport {
    /// Whether the build subprocess exited successfully.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// The last `limit` lines of the combined output, surrounding whitespace trimmed.
    pub fn tail(&self, limit: usize) -> Vec<&str> {
        let lines: Vec<&str> = self.output.trim().lines().collect();
        let start = lines.len().saturating_sub(limit);
        lines[start..].to_vec()
    }
}

/// Run a clean simulator build for the configured project and capture its output.
///
/// Blocks until `xcodebuild` exits; there is no timeout or cancellation.
pub fn run_clean_build(config: &ProjectConfig) -> Result<BuildReport> {
    let mut command = Command::new("xcodebuild");
    command
        .arg("-project")
        .arg(config.xcodeproj_path())
        .args(["-scheme", &config.scheme])
        .args(["-destination", &config.destination])
        .args(["clean", "build"]);
    run_command(command)
}

/// Execute a prepared command, combining its stdout and stderr into one report.
pub fn run_command(mut command: Command) -> Result<BuildReport> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .with_context(|| format!("failed to run {program}"))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(BuildReport {
        exit_code: output.status.code().unwrap_or(SIGNALLED_EXIT_CODE),
        output: combined,
    })
}
