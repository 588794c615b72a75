use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::EntryField;

/// Main application error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Unable to read file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Structural(#[from] StructuralError),

    #[error("{0}")]
    Liveness(#[from] LivenessError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout: {url} after {timeout_seconds} seconds")]
    Timeout { url: String, timeout_seconds: u64 },
}

impl ValidationError {
    /// Short name of the pipeline stage that produced the error
    pub fn category(&self) -> &'static str {
        match self {
            ValidationError::Read { .. } | ValidationError::Parse(_) => "parse",
            ValidationError::Structural(_) => "structure",
            ValidationError::Liveness(_) => "liveness",
            ValidationError::Http(_) | ValidationError::Timeout { .. } => "runtime",
        }
    }
}

/// Identifies an entry in diagnostics: its 1-based position and, when readable, its title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLabel {
    pub index: usize,
    pub title: Option<String>,
}

impl EntryLabel {
    pub fn new(index: usize, title: Option<String>) -> Self {
        Self {
            index,
            title: title.filter(|t| !t.is_empty()),
        }
    }

    pub fn untitled(index: usize) -> Self {
        Self { index, title: None }
    }
}

impl fmt::Display for EntryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "Entry {}: '{}'", self.index, title),
            None => write!(f, "Entry {}:", self.index),
        }
    }
}

/// Schema violations found without touching the network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("JSON body must be a defined Array.")]
    BodyNotArray,

    #[error("{label}\n{violation}")]
    Entry {
        label: EntryLabel,
        violation: EntryViolation,
    },
}

impl StructuralError {
    pub fn entry(label: EntryLabel, violation: EntryViolation) -> Self {
        StructuralError::Entry { label, violation }
    }

    /// The violation for entry-level errors
    pub fn violation(&self) -> Option<&EntryViolation> {
        match self {
            StructuralError::BodyNotArray => None,
            StructuralError::Entry { violation, .. } => Some(violation),
        }
    }
}

/// The rule a single entry broke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryViolation {
    #[error("The entry must be a defined Object.")]
    NotObject,

    #[error("An expected property is missing: {0}")]
    MissingProperty(EntryField),

    #[error("There were extraneous properties found: {}", .0.join(", "))]
    ExtraneousProperties(Vec<String>),

    #[error("The '{0}' property value is undefined or invalid.")]
    Undefined(EntryField),

    #[error("The 'id' property value is not a valid GUID.")]
    InvalidGuid,

    #[error("The 'message' property value must be a defined String.")]
    MessageNotString,

    #[error("The '{0}' property value must be a syntactically valid URL.")]
    InvalidUrl(EntryField),

    #[error("The '{0}' property value must be a secure URL (i.e. HTTPS)")]
    InsecureUrl(EntryField),
}

/// A liveness probe that did not get an HTTP 200 back
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "{label}\n{}Failed to retrieve content for '{field}' property value: {url}",
    status_tag(.status)
)]
pub struct LivenessError {
    pub label: EntryLabel,
    pub field: EntryField,
    pub url: String,
    /// HTTP status when a response arrived; `None` for transport failures
    pub status: Option<u16>,
}

fn status_tag(status: &Option<u16>) -> String {
    status.map(|s| format!("[{}] ", s)).unwrap_or_default()
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ValidationError>;
