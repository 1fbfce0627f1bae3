//! CLI argument parsing module for depprobe

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::domain::VerificationProfile;

/// Profile selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    /// Classify from the manifest
    Auto,
    /// Generic checks only
    Generic,
    /// Azure CLI development environment
    Azdev,
    /// AAZ code generation toolchain
    #[value(name = "aaz-dev", alias = "aaz_dev")]
    AazDev,
}

impl ProfileArg {
    /// Returns the forced profile, or `None` for auto classification
    pub fn forced(self) -> Option<VerificationProfile> {
        match self {
            ProfileArg::Auto => None,
            ProfileArg::Generic => Some(VerificationProfile::Generic),
            ProfileArg::Azdev => Some(VerificationProfile::Azdev),
            ProfileArg::AazDev => Some(VerificationProfile::AazDev),
        }
    }
}

/// Parse a timeout in whole seconds; zero is rejected
fn parse_timeout(s: &str) -> Result<u64, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of seconds: {}", s))?;
    if secs == 0 {
        return Err("timeout must be at least 1 second".to_string());
    }
    Ok(secs)
}

/// Verify that every dependency in a manifest imports in a target interpreter
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depprobe",
    version,
    about = "Verify that every dependency in a manifest imports in a target interpreter"
)]
pub struct CliArgs {
    /// Requirements file or pyproject.toml to verify
    pub manifest: PathBuf,

    /// Runtime-version label, e.g. 3.13 (shown in the report)
    pub runtime: String,

    /// Platform label, e.g. linux (shown in the report)
    pub platform: String,

    // Interpreter options
    /// Interpreter command to probe with (default: python3, or python on Windows)
    #[arg(long)]
    pub python: Option<String>,

    /// Per-probe time limit in seconds (default: 60)
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    /// Run every probe in a fresh interpreter process
    #[arg(long)]
    pub isolate: bool,

    // Verification options
    /// Verification profile
    #[arg(long, value_enum)]
    pub profile: Option<ProfileArg>,

    /// Skip importing a package (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub skip: Vec<String>,

    /// Configuration file (default: depprobe.toml next to the manifest)
    #[arg(long)]
    pub config: Option<PathBuf>,

    // Output options
    /// Output the report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - no progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Whether a progress bar should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
