use async_trait::async_trait;

use super::{SearchError, SearchPage};

/// Trait for reading access-log messages page by page.
///
/// Pages are ordered by timestamp ascending. The cursor passed in is the
/// `cursor` of the previously returned page; `None` requests the first page.
#[async_trait]
pub trait LogSource: Send + Sync + std::fmt::Debug {
    /// Fetch one page of messages newer than or equal to `since`.
    async fn fetch_page(&self, since: &str, cursor: Option<i64>)
        -> Result<SearchPage, SearchError>;
}
