//! Decoding of nginx JSON access-log lines into latency samples.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use super::normalize::normalize_path;

/// One decoded access-log record.
///
/// Every field is optional on the wire; absent and `null` both decode to an
/// empty string.
/// Only `request` and `upstream_response_time` feed the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogMessage {
    #[serde(deserialize_with = "null_as_empty")]
    pub host: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub proxy_protocol_addr: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub true_client_ip: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub tenant_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub time: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub ssl_protocol: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub ssl_client_fingerprint: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub request_time: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub upstream_response_time: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub request: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub referer: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub user_agent: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A latency observation keyed by its normalized path.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySample {
    pub path: String,
    /// Upstream response time in seconds
    pub seconds: f64,
}

/// Latency samples grouped by normalized path, in arrival order per group.
pub type LatencySamples = BTreeMap<String, Vec<f64>>;

/// Result of decoding a single line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Sample(LatencySample),
    /// Line is not a JSON object of the expected shape
    Malformed,
    /// `upstream_response_time` is missing or not a finite decimal number
    InvalidLatency,
}

/// Samples collected from a batch of lines, plus how many lines were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseSummary {
    pub samples: LatencySamples,
    pub malformed: usize,
    pub invalid_latency: usize,
}

impl ParseSummary {
    /// Total number of samples across all groups
    pub fn sample_count(&self) -> usize {
        self.samples.values().map(Vec::len).sum()
    }
}

impl LogMessage {
    /// Parse `upstream_response_time` as seconds.
    pub fn upstream_seconds(&self) -> Option<f64> {
        self.upstream_response_time
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

/// Decode one log line into a latency sample.
pub fn decode_line(line: &str) -> LineOutcome {
    let message: LogMessage = match serde_json::from_str(line) {
        Ok(message) => message,
        Err(_) => return LineOutcome::Malformed,
    };

    match message.upstream_seconds() {
        Some(seconds) => LineOutcome::Sample(LatencySample {
            path: normalize_path(&message.request),
            seconds,
        }),
        None => LineOutcome::InvalidLatency,
    }
}

/// Decode every line and group the resulting samples by normalized path.
pub fn parse_messages<I, S>(lines: I) -> ParseSummary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut summary = ParseSummary::default();

    for line in lines {
        match decode_line(line.as_ref()) {
            LineOutcome::Sample(sample) => summary
                .samples
                .entry(sample.path)
                .or_default()
                .push(sample.seconds),
            LineOutcome::Malformed => summary.malformed += 1,
            LineOutcome::InvalidLatency => summary.invalid_latency += 1,
        }
    }

    tracing::debug!(
        groups = summary.samples.len(),
        malformed = summary.malformed,
        invalid_latency = summary.invalid_latency,
        "Parsed access-log messages"
    );

    summary
}
