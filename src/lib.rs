pub mod config;
pub mod report;
pub mod search;
pub mod telemetry;
pub mod version;

pub use config::AppConfig;
pub use report::{LatencyReport, PathStat, ReportError, ReportOrchestrator};
pub use search::{LogSource, OpenSearchClient, SearchError, SearchPage};
