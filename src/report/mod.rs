//! Latency report pipeline: parse access-log lines, group by normalized
//! path, summarize, and render.

mod error;
pub mod interval;
pub mod normalize;
mod orchestrator;
pub mod parser;
pub mod stats;
pub mod table;

pub use error::ReportError;
pub use interval::parse_interval;
pub use normalize::normalize_path;
pub use orchestrator::{since_timestamp, Collected, LatencyReport, ReportOrchestrator};
pub use parser::{decode_line, parse_messages, LineOutcome, LogMessage, ParseSummary};
pub use stats::{aggregate, PathStat};
pub use table::render_table;
