//! Simple Output and Reporting
//!
//! Progress lines go to stdout, fatal messages to stderr. Formatting is kept separate from
//! printing so it can be tested.

use std::path::Path;
use std::time::Duration;

use crate::cli::VerbosityLevel;
use crate::error::ValidationError;
use crate::pipeline::{PipelineReport, PipelineStage};

/// Simple output formatter for human-readable results
pub struct Output {
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    /// Output without ANSI colours, regardless of the terminal
    pub fn plain(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: false,
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_file_header(&self, path: &Path, target: Option<&str>) -> String {
        match target {
            Some(target) => format!("\nFile: {} ({})", path.display(), target),
            None => format!("\nFile: {}", path.display()),
        }
    }

    pub fn format_stage(&self, stage: PipelineStage) -> String {
        format!("\n{}\n", stage.description())
    }

    pub fn format_pass(&self) -> String {
        format!("{}\n", self.colorize("[PASS]", "32"))
    }

    pub fn format_fatal(&self, error: &ValidationError) -> String {
        let mut output = format!("{} {}", self.colorize("Fatal error:", "31"), error);
        if self.verbosity == VerbosityLevel::Debug {
            output.push_str(&format!("\nDebug: {:?}", error));
        }
        output
    }

    pub fn format_report(&self, report: &PipelineReport) -> String {
        format!(
            "Checked {} entr{} and {} URL{} ({})",
            report.entries,
            if report.entries == 1 { "y" } else { "ies" },
            report.probes,
            if report.probes == 1 { "" } else { "s" },
            format_duration(report.duration)
        )
    }

    /// Print a progress line unless quiet
    pub fn progress(&self, line: &str) {
        if self.verbosity > VerbosityLevel::Quiet {
            println!("{}", line);
        }
    }

    /// Print a per-file summary in verbose mode
    pub fn report(&self, report: &PipelineReport) {
        if self.verbosity >= VerbosityLevel::Verbose {
            println!("{}", self.format_report(report));
        }
    }

    /// Fatal messages are printed at every verbosity
    pub fn fatal(&self, error: &ValidationError) {
        eprintln!("{}", self.format_fatal(error));
    }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{:.0}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
