use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show fatal errors
    Quiet,
    /// Show stage progress
    #[default]
    Normal,
    /// Also log every probed URL
    Verbose,
    /// Show all available debugging information
    Debug,
}

/// Changelog validation task
#[derive(Parser, Debug, Clone)]
#[command(name = "changelog-validate")]
#[command(about = "Validate changelog entry files and check that every referenced URL is live")]
#[command(version)]
pub struct Cli {
    /// Changelog JSON files to validate
    #[arg(help = "Changelog entry files (overrides configured targets)")]
    pub files: Vec<PathBuf>,

    /// Named targets from the configuration file
    #[arg(short = 't', long = "target", action = clap::ArgAction::Append)]
    pub targets: Vec<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Per-request timeout in seconds for URL checks
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(timeout) = self.timeout
            && timeout == 0
        {
            return Err("Timeout must be greater than 0".to_string());
        }
        if !self.files.is_empty() && !self.targets.is_empty() {
            return Err("Pass either files or --target, not both".to_string());
        }
        Ok(())
    }

    /// Verbosity requested on the command line, if any
    pub fn verbosity(&self) -> Option<VerbosityLevel> {
        match (self.quiet, self.verbose) {
            (true, _) => Some(VerbosityLevel::Quiet),
            (false, 0) => None,
            (false, 1) => Some(VerbosityLevel::Verbose),
            (false, _) => Some(VerbosityLevel::Debug),
        }
    }
}
