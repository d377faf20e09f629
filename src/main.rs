//! Command-line entry point: patch the manifest, clear caches, build, report.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use pbxsync::config::ProjectConfig;
use pbxsync::derived_data;
use pbxsync::models::CandidateOutcome;
use pbxsync::patcher::ProjectPatcher;
use pbxsync::xcodebuild;

#[derive(Parser)]
#[command(name = "pbxsync", version)]
#[command(about = "Register missing source files in an Xcode project manifest and rebuild")]
struct Cli {
    /// Path to a JSON configuration file (default: pbxsync.config.json if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured project directory
    #[arg(long)]
    project_dir: Option<String>,

    /// Number of trailing build output lines to print
    #[arg(long)]
    tail: Option<usize>,

    /// Patch the manifest only; skip cache eviction and the build
    #[arg(long)]
    no_build: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match ProjectConfig::from_path(path) {
            Some(config) => config,
            None => {
                eprintln!("ERROR: Cannot load configuration from {}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => ProjectConfig::discover(Path::new(".")),
    };
    if let Some(project_dir) = cli.project_dir {
        config.project_dir = project_dir;
    }
    if let Some(tail) = cli.tail {
        config.build_output_tail = tail;
    }

    run(&config, cli.no_build)
}

fn run(config: &ProjectConfig, no_build: bool) -> ExitCode {
    println!("{}", "=".repeat(50));
    println!("{} PROJECT SYNC", config.project_name.to_uppercase());
    println!("{}", "=".repeat(50));

    let summary = match ProjectPatcher::new(config).patch() {
        Ok(summary) => summary,
        Err(err) => {
            println!("ERROR: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    println!("Created backup: {}", summary.backup_path.display());

    for (candidate, outcome) in &summary.outcomes {
        match outcome {
            CandidateOutcome::MissingFromDisk => println!("SKIP: {} not on disk", candidate.name),
            CandidateOutcome::AlreadyRegistered => {
                println!("OK: {} already in project", candidate.name)
            }
            CandidateOutcome::Registered => println!("ADDING: {}", candidate.name),
        }
    }

    if summary.rewritten {
        println!("\nUpdated project with {} files", summary.files_added);
    } else {
        println!("\nNo files needed adding");
    }

    if no_build {
        return ExitCode::SUCCESS;
    }

    println!("\nCleaning Xcode caches...");
    if let Some(cache_dir) = config.derived_data_path() {
        match derived_data::evict_project_caches(&cache_dir, &config.project_name) {
            Ok(removed) => {
                for name in removed {
                    println!("  Removed: {name}");
                }
            }
            Err(err) => {
                println!("ERROR: {err:#}");
                return ExitCode::FAILURE;
            }
        }
    }

    println!("\nBuilding project...");
    let report = match xcodebuild::run_clean_build(config) {
        Ok(report) => report,
        Err(err) => {
            println!("ERROR: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    println!("\nBuild output (last {} lines):", config.build_output_tail);
    for line in report.tail(config.build_output_tail) {
        println!("  {line}");
    }

    if report.succeeded() {
        println!("\n✅ BUILD SUCCEEDED");
    } else {
        println!("\n❌ BUILD FAILED");
    }

    ExitCode::from(u8::try_from(report.exit_code).unwrap_or(1))
}
