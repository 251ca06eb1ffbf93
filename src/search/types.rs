use serde::Deserialize;

use super::SearchError;

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    /// Raw `message` field of every hit, in sort order
    pub messages: Vec<String>,
    /// Primary sort value of the last hit; None when the page is empty
    pub cursor: Option<i64>,
    /// Server-side search time in milliseconds, when reported
    pub took_ms: Option<u64>,
}

impl SearchPage {
    /// An empty page marks the end of the result set.
    pub fn is_exhausted(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    took: Option<u64>,
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source", default)]
    source: HitSource,
    #[serde(default)]
    sort: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct HitSource {
    #[serde(default)]
    message: String,
}

/// Decode a search response body into a page.
pub fn parse_search_response(body: &[u8]) -> Result<SearchPage, SearchError> {
    let response: SearchResponse = serde_json::from_slice(body)?;

    let cursor = match response.hits.hits.last() {
        Some(last) => Some(*last.sort.first().ok_or_else(|| {
            SearchError::Decode("last hit carries no sort value".to_string())
        })?),
        None => None,
    };

    let messages = response
        .hits
        .hits
        .into_iter()
        .map(|hit| hit.source.message)
        .collect();

    Ok(SearchPage {
        messages,
        cursor,
        took_ms: response.took,
    })
}
