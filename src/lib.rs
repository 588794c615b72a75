//! # changelog-validate Library
//!
//! Validates changelog entry files for a build pipeline: the JSON must follow a fixed entry
//! schema, and every image and blog URL an entry references must answer HTTP 200.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod http_client;
pub mod liveness;
pub mod output;
pub mod pipeline;
pub mod schema;

pub use cli::{Cli, VerbosityLevel};
pub use config::{Config, ConfigError, ConfigManager, TargetConfig, ValidationInput};
pub use error::{EntryLabel, EntryViolation, LivenessError, StructuralError, ValidationError};
pub use http_client::{AsyncHttpClient, FetchResponse, HttpClientConfig, UrlFetcher};
pub use liveness::{LivenessChecker, LivenessSummary, ProbeOutcome, ProbeSuccess};
pub use output::Output;
pub use pipeline::{Pipeline, PipelineReport, PipelineStage, parse_document};
pub use schema::{ChangelogEntry, EntryField, validate_document, validate_entry};
