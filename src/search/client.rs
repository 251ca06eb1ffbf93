//! OpenSearch-backed [`LogSource`].

use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

use super::query::{build_query, QueryParams};
use super::types::parse_search_response;
use super::{LogSource, SearchError, SearchPage};
use crate::config::SearchConfig;

/// Search client for the access-log index.
///
/// TLS certificate verification is disabled for every configured address.
/// The backends this tool targets sit behind self-signed certificates; the
/// gap is accepted and surfaced in a warning at construction.
#[derive(Debug)]
pub struct OpenSearchClient {
    http: Client,
    endpoints: Vec<Url>,
    next_endpoint: AtomicUsize,
    username: Option<String>,
    password: Option<String>,
    namespace: String,
    container: String,
    page_size: usize,
}

impl OpenSearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        if config.addresses.is_empty() {
            return Err(SearchError::Connection(
                "no backend addresses configured".to_string(),
            ));
        }

        let endpoints = config
            .addresses
            .iter()
            .map(|address| search_endpoint(address, &config.index))
            .collect::<Result<Vec<_>, _>>()?;

        let http = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| {
                SearchError::Connection(format!("Failed to build HTTP client: {}", e))
            })?;

        tracing::warn!(
            endpoints = endpoints.len(),
            "TLS certificate verification is disabled for the search backend"
        );

        Ok(Self {
            http,
            endpoints,
            next_endpoint: AtomicUsize::new(0),
            username: config.username.clone(),
            password: config.password.clone(),
            namespace: config.namespace.clone(),
            container: config.container.clone(),
            page_size: config.page_size,
        })
    }

    /// Pick the next endpoint round-robin.
    fn endpoint(&self) -> &Url {
        let i = self.next_endpoint.fetch_add(1, Ordering::Relaxed);
        &self.endpoints[i % self.endpoints.len()]
    }
}

/// Build `{address}/{index}/_search`, keeping any path prefix on the address.
fn search_endpoint(address: &str, index: &str) -> Result<Url, SearchError> {
    let mut url = Url::parse(address).map_err(|e| {
        SearchError::Connection(format!("Invalid backend address '{}': {}", address, e))
    })?;

    url.path_segments_mut()
        .map_err(|_| {
            SearchError::Connection(format!(
                "Backend address '{}' cannot be used as a base URL",
                address
            ))
        })?
        .pop_if_empty()
        .push(index)
        .push("_search");

    Ok(url)
}

#[async_trait]
impl LogSource for OpenSearchClient {
    async fn fetch_page(
        &self,
        since: &str,
        cursor: Option<i64>,
    ) -> Result<SearchPage, SearchError> {
        let body = build_query(&QueryParams {
            namespace: &self.namespace,
            container: &self.container,
            since,
            cursor,
            size: self.page_size,
        });

        let endpoint = self.endpoint();
        tracing::debug!(endpoint = %endpoint, ?cursor, "Requesting search page");

        let mut request = self.http.post(endpoint.clone()).json(&body);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        parse_search_response(&bytes)
    }
}
