use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::parser::parse_messages;
use super::stats::{aggregate, PathStat};
use super::ReportError;
use crate::search::{LogSource, SearchError};

/// Timestamp layout expected by the range filter (UTC, no zone suffix).
pub const SINCE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Messages gathered by the page loop.
#[derive(Debug, Default)]
pub struct Collected {
    pub messages: Vec<String>,
    /// Number of non-empty pages fetched
    pub pages: usize,
    /// Sum of backend-reported search times, in milliseconds
    pub took_ms: u64,
    /// Page failure that stopped pagination early, if any
    pub interrupted: Option<SearchError>,
}

/// Ranked latency statistics for one run.
#[derive(Debug)]
pub struct LatencyReport {
    /// Per-path statistics, slowest average first
    pub stats: Vec<PathStat>,
    /// Messages fetched across all pages
    pub messages: usize,
    /// Messages that yielded a latency sample
    pub samples: usize,
    pub pages: usize,
    pub took_ms: u64,
    pub interrupted: Option<SearchError>,
}

impl LatencyReport {
    /// True when a page failure cut pagination short.
    pub fn is_partial(&self) -> bool {
        self.interrupted.is_some()
    }
}

/// Lower bound of the search window: `now - interval`, second precision.
pub fn since_timestamp(now: DateTime<Utc>, interval: Duration) -> Result<String, ReportError> {
    let out_of_range = || ReportError::IntervalOutOfRange(format!("{:?}", interval));

    let delta = TimeDelta::from_std(interval).map_err(|_| out_of_range())?;
    let since = now.checked_sub_signed(delta).ok_or_else(out_of_range)?;

    Ok(since.format(SINCE_FORMAT).to_string())
}

/// Drives pagination against a [`LogSource`] and turns the collected lines
/// into a [`LatencyReport`].
///
/// Any page failure, including on the first page, stops pagination; the
/// messages gathered so far are still reported and the failure is kept on
/// the result. Cancellation discards everything and returns
/// [`ReportError::Cancelled`].
#[derive(Debug)]
pub struct ReportOrchestrator {
    source: Arc<dyn LogSource>,
}

impl ReportOrchestrator {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self { source }
    }

    /// Fetch every page newer than `since` into memory.
    pub async fn collect(
        &self,
        since: &str,
        cancel: &CancellationToken,
    ) -> Result<Collected, ReportError> {
        let mut collected = Collected::default();
        let mut cursor: Option<i64> = None;

        loop {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ReportError::Cancelled),
                result = self.source.fetch_page(since, cursor) => result,
            };

            let page = match result {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        pages = collected.pages,
                        messages = collected.messages.len(),
                        "Stopping pagination after page failure: {}",
                        e
                    );
                    collected.interrupted = Some(e);
                    break;
                }
            };

            if let Some(took) = page.took_ms {
                collected.took_ms += took;
            }

            if page.is_exhausted() {
                break;
            }

            let Some(next) = page.cursor else {
                let e = SearchError::Decode("non-empty page returned no cursor".to_string());
                tracing::warn!("Stopping pagination: {}", e);
                collected.interrupted = Some(e);
                break;
            };

            collected.pages += 1;
            collected.messages.extend(page.messages);
            cursor = Some(next);

            tracing::debug!(
                page = collected.pages,
                total = collected.messages.len(),
                cursor = next,
                "Fetched page"
            );
        }

        Ok(collected)
    }

    /// Fetch, parse and aggregate.
    pub async fn run(
        &self,
        since: &str,
        cancel: &CancellationToken,
    ) -> Result<LatencyReport, ReportError> {
        let collected = self.collect(since, cancel).await?;

        tracing::info!("Total number of requests: {}", collected.messages.len());

        let summary = parse_messages(&collected.messages);
        let stats = aggregate(&summary.samples);

        Ok(LatencyReport {
            stats,
            messages: collected.messages.len(),
            samples: summary.sample_count(),
            pages: collected.pages,
            took_ms: collected.took_ms,
            interrupted: collected.interrupted,
        })
    }
}
