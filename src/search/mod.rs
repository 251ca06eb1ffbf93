mod client;
mod error;
pub mod query;
mod source;
mod types;

pub use client::OpenSearchClient;
pub use error::SearchError;
pub use source::LogSource;
pub use types::{parse_search_response, SearchPage};
