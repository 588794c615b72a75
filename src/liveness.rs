//! Concurrent URL Liveness Checks
//!
//! Every URL-bearing field of every entry gets one GET. All probes are started up front,
//! run concurrently on the runtime, and are awaited together. The checker then reports the
//! first failure in completion order; when several probes fail it is unspecified which one
//! that is.
//!
//! There is no throttling or batching: the fan-out is as wide as the document.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tracing::debug;

use crate::error::{EntryLabel, LivenessError};
use crate::http_client::UrlFetcher;
use crate::schema::{ChangelogEntry, EntryField};

/// Result of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub label: EntryLabel,
    pub field: EntryField,
    pub url: String,
    pub result: Result<ProbeSuccess, LivenessError>,
}

/// A probe that got an HTTP 200
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSuccess {
    pub body_len: usize,
}

/// Totals for a liveness run where every probe passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessSummary {
    pub probes: usize,
    pub duration: Duration,
}

pub struct LivenessChecker {
    fetcher: Arc<dyn UrlFetcher>,
}

impl LivenessChecker {
    pub fn new(fetcher: Arc<dyn UrlFetcher>) -> Self {
        Self { fetcher }
    }

    /// Probe every URL and wait for all of them to settle
    pub async fn probe_all(&self, entries: &[ChangelogEntry]) -> Vec<ProbeOutcome> {
        let mut probes = FuturesUnordered::new();

        for (i, entry) in entries.iter().enumerate() {
            let label = EntryLabel::new(i + 1, Some(entry.title.clone()));
            for (field, url) in entry.urls() {
                probes.push(Self::probe(
                    Arc::clone(&self.fetcher),
                    label.clone(),
                    field,
                    url.to_string(),
                ));
            }
        }

        let mut outcomes = Vec::with_capacity(probes.len());
        while let Some(outcome) = probes.next().await {
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Probe every URL; fail with the first reported failure if any probe failed
    pub async fn check(
        &self,
        entries: &[ChangelogEntry],
    ) -> Result<LivenessSummary, LivenessError> {
        let start = Instant::now();
        let outcomes = self.probe_all(entries).await;
        let probes = outcomes.len();

        if let Some(failure) = outcomes.into_iter().find_map(|o| o.result.err()) {
            return Err(failure);
        }

        Ok(LivenessSummary {
            probes,
            duration: start.elapsed(),
        })
    }

    async fn probe(
        fetcher: Arc<dyn UrlFetcher>,
        label: EntryLabel,
        field: EntryField,
        url: String,
    ) -> ProbeOutcome {
        debug!("GET {}", url);

        let failure = |status: Option<u16>| LivenessError {
            label: label.clone(),
            field,
            url: url.clone(),
            status,
        };

        let result = match fetcher.fetch(&url).await {
            Ok(response) if response.is_ok() => {
                debug!("[PASS] {}", url);
                Ok(ProbeSuccess {
                    body_len: response.body.len(),
                })
            }
            Ok(response) => {
                debug!(status = response.status, "[FAIL] {}", url);
                Err(failure(Some(response.status)))
            }
            Err(err) => {
                debug!(error = %err, "[FAIL] {}", url);
                Err(failure(None))
            }
        };

        ProbeOutcome {
            label,
            field,
            url,
            result,
        }
    }
}
