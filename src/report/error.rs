//! Error types for report generation

use thiserror::Error;

/// Errors that abort report generation
#[derive(Debug, Error)]
pub enum ReportError {
    /// Interval string is not a valid duration
    #[error("invalid interval '{0}': use forms like 1m, 15m, 30m, 1h")]
    InvalidInterval(String),

    /// Interval reaches further back than the clock can represent
    #[error("interval '{0}' is out of range")]
    IntervalOutOfRange(String),

    /// Caller cancelled the run before pagination finished
    #[error("report cancelled before all pages were fetched")]
    Cancelled,
}
