//! Query body for one page of the access-log search.

use serde_json::{json, Value};

/// Parameters of a single page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams<'a> {
    /// Value of the `dissect.namespace` term filter
    pub namespace: &'a str,
    /// Value of the `dissect.container_name` term filter
    pub container: &'a str,
    /// Inclusive lower bound, `%Y-%m-%dT%H:%M:%S` in UTC
    pub since: &'a str,
    /// Sort value of the last hit of the previous page
    pub cursor: Option<i64>,
    pub size: usize,
}

/// Build the JSON body for a page request.
///
/// The filter, sort and `_source` restriction are identical for every page;
/// `search_after` is only present once a non-zero cursor is known.
pub fn build_query(params: &QueryParams<'_>) -> Value {
    let mut body = json!({
        "query": {
            "bool": {
                "filter": [
                    { "term": { "dissect.namespace": params.namespace } },
                    { "term": { "dissect.container_name": params.container } },
                    { "range": { "@timestamp": { "gte": params.since } } }
                ]
            }
        },
        "sort": [ { "@timestamp": "asc" } ],
        "_source": [ "message", "@timestamp" ],
        "size": params.size
    });

    if let Some(cursor) = params.cursor.filter(|c| *c != 0) {
        body["search_after"] = json!([cursor]);
    }

    body
}
