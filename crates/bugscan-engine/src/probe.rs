use crate::{CancelToken, Result};
use bugscan_types::{Endpoint, EndpointIssue};
use futures::stream::{self, StreamExt};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Upper bound for one request, connect through response headers
    pub timeout: Duration,
    /// Maximum probes in flight at once
    pub concurrency: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Result of probing a list of endpoints
#[derive(Debug, Clone, Default)]
pub struct ProbeOutcome {
    /// At most one issue per endpoint, in input order
    pub issues: Vec<EndpointIssue>,
    /// Endpoints that received a verdict (healthy or not)
    pub checked: usize,
    /// Endpoints abandoned because the run was cancelled
    pub skipped: usize,
}

/// Single-attempt HTTP GET health checks
#[derive(Debug, Clone)]
pub struct EndpointProbe {
    client: reqwest::Client,
    settings: ProbeSettings,
}

impl EndpointProbe {
    pub fn new(settings: ProbeSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;

        Ok(Self { client, settings })
    }

    /// Probe every endpoint; one failure never stops the others
    pub async fn check(&self, endpoints: &[Endpoint]) -> Vec<EndpointIssue> {
        self.check_until(endpoints, &CancelToken::new()).await.issues
    }

    /// Probe every endpoint until `cancel` fires.
    ///
    /// Verdicts reached before cancellation are kept; probes still in flight
    /// are dropped and counted as skipped.
    pub async fn check_until(&self, endpoints: &[Endpoint], cancel: &CancelToken) -> ProbeOutcome {
        let verdicts: Vec<Option<Option<EndpointIssue>>> = stream::iter(endpoints)
            .map(|endpoint| async move {
                if cancel.is_cancelled() {
                    return None;
                }
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    verdict = self.probe(endpoint) => Some(verdict),
                }
            })
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let mut outcome = ProbeOutcome::default();
        for verdict in verdicts {
            match verdict {
                Some(issue) => {
                    outcome.checked += 1;
                    outcome.issues.extend(issue);
                }
                None => outcome.skipped += 1,
            }
        }

        tracing::info!(
            checked = outcome.checked,
            skipped = outcome.skipped,
            issues = outcome.issues.len(),
            "endpoint probe finished"
        );
        outcome
    }

    /// Probe one endpoint; `None` means healthy
    pub async fn probe(&self, endpoint: &Endpoint) -> Option<EndpointIssue> {
        let url = endpoint.as_str();
        tracing::debug!(url, "probing endpoint");

        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status == reqwest::StatusCode::OK {
                    None
                } else {
                    tracing::debug!(url, status = status.as_u16(), "unexpected status");
                    Some(EndpointIssue::status_mismatch(url, status.as_u16()))
                }
            }
            Err(err) => {
                let detail = self.describe_failure(&err);
                tracing::debug!(url, detail = %detail, "endpoint unreachable");
                Some(EndpointIssue::unreachable(url, detail))
            }
        }
    }

    fn describe_failure(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!("timed out after {:?}", self.settings.timeout)
        } else if err.is_builder() {
            format!("invalid URL ({})", root_cause(err))
        } else if err.is_connect() {
            format!("connection failed ({})", root_cause(err))
        } else {
            root_cause(err)
        }
    }
}

/// Innermost error message, without the URL prefix reqwest adds
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(next) = current.source() {
        current = next;
    }
    current.to_string()
}
