//! Changelog Validation Pipeline
//!
//! Three gated stages per file:
//! 1. read and parse the JSON
//! 2. structural validation of every entry (no network access)
//! 3. liveness checks of every referenced URL
//!
//! A stage only runs once the previous one passed, so a malformed document never causes
//! network traffic. The first failure ends the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::info;

use crate::config::ValidationInput;
use crate::error::{Result, ValidationError};
use crate::http_client::UrlFetcher;
use crate::liveness::LivenessChecker;
use crate::output::Output;
use crate::schema::validate_document;

/// Stage of the pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Syntax,
    Grammar,
    Urls,
}

impl PipelineStage {
    pub fn description(self) -> &'static str {
        match self {
            PipelineStage::Syntax => "Checking Change Log JSON syntax...",
            PipelineStage::Grammar => "Validating Change Log JSON grammar...",
            PipelineStage::Urls => "Validating Change Log URLs...",
        }
    }
}

/// What a successful run checked
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub path: Option<PathBuf>,
    pub entries: usize,
    pub probes: usize,
    pub duration: Duration,
}

pub struct Pipeline {
    checker: LivenessChecker,
    output: Output,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn UrlFetcher>, output: Output) -> Self {
        Self {
            checker: LivenessChecker::new(fetcher),
            output,
        }
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    /// Run every input in order, stopping at the first failure
    pub async fn run_inputs(&self, inputs: &[ValidationInput]) -> Result<Vec<PipelineReport>> {
        let mut reports = Vec::with_capacity(inputs.len());
        for input in inputs {
            self.output.progress(
                &self
                    .output
                    .format_file_header(&input.path, input.target.as_deref()),
            );
            reports.push(self.run_file(&input.path).await?);
        }
        Ok(reports)
    }

    /// Validate one changelog file
    pub async fn run_file(&self, path: &Path) -> Result<PipelineReport> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ValidationError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut report = self.run_bytes(&bytes).await?;
        report.path = Some(path.to_path_buf());
        info!(path = %path.display(), entries = report.entries, probes = report.probes, "changelog passed");
        self.output.report(&report);
        Ok(report)
    }

    /// Validate an in-memory changelog document
    pub async fn run_bytes(&self, bytes: &[u8]) -> Result<PipelineReport> {
        let start = Instant::now();

        self.output
            .progress(&self.output.format_stage(PipelineStage::Syntax));
        let document = parse_document(bytes)?;
        self.output.progress(&self.output.format_pass());

        self.output
            .progress(&self.output.format_stage(PipelineStage::Grammar));
        let entries = validate_document(&document)?;
        self.output.progress(&self.output.format_pass());

        self.output
            .progress(&self.output.format_stage(PipelineStage::Urls));
        let summary = self.checker.check(&entries).await?;
        self.output.progress(&self.output.format_pass());

        Ok(PipelineReport {
            path: None,
            entries: entries.len(),
            probes: summary.probes,
            duration: start.elapsed(),
        })
    }
}

/// Parse raw bytes as a JSON document
pub fn parse_document(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}
