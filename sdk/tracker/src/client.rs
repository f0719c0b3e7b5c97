use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::FetchError;
use crate::model::SearchPage;
use crate::query::SearchQuery;

const SEARCH_PATH: &str = "rest/api/3/search";

/// Source of search result pages
///
/// Implemented by [`TrackerClient`] over HTTP; tests substitute scripted pages.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn search(
        &self,
        query: &SearchQuery,
        start_at: u64,
        max_results: u32,
    ) -> Result<SearchPage, FetchError>;
}

/// Connection settings for the tracker's REST API
#[derive(Clone)]
pub struct TrackerSettings {
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for TrackerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerSettings")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP search client (basic auth, JSON responses)
pub struct TrackerClient {
    client: reqwest::Client,
    search_url: Url,
    email: String,
    api_token: String,
}

impl std::fmt::Debug for TrackerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerClient")
            .field("search_url", &self.search_url.as_str())
            .field("email", &self.email)
            .finish()
    }
}

impl TrackerClient {
    pub fn new(settings: &TrackerSettings) -> Result<Self, FetchError> {
        let search_url = search_url(&settings.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .default_headers(headers)
            .user_agent(format!("TicketLens/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!(
            url = %search_url,
            timeout_secs = settings.timeout.as_secs(),
            "Tracker client initialized"
        );

        Ok(Self {
            client,
            search_url,
            email: settings.email.clone(),
            api_token: settings.api_token.clone(),
        })
    }
}

/// Resolve `{base}/rest/api/3/search`, tolerating a trailing slash on the base
fn search_url(base_url: &str) -> Result<Url, FetchError> {
    let base = base_url.trim();
    if base.is_empty() {
        return Err(FetchError::Config("tracker base URL is empty".to_string()));
    }
    let normalized = format!("{}/", base.trim_end_matches('/'));
    Url::parse(&normalized)
        .and_then(|u| u.join(SEARCH_PATH))
        .map_err(|e| FetchError::Config(format!("invalid tracker base URL '{}': {}", base, e)))
}

#[async_trait]
impl SearchTransport for TrackerClient {
    async fn search(
        &self,
        query: &SearchQuery,
        start_at: u64,
        max_results: u32,
    ) -> Result<SearchPage, FetchError> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("jql", &query.jql())
            .append_pair("startAt", &start_at.to_string())
            .append_pair("maxResults", &max_results.to_string())
            .append_pair("fields", &query.fields_param());

        tracing::trace!(project = %query.project, start_at, max_results, "Requesting search page");

        let resp = self
            .client
            .get(url)
            .basic_auth(&self.email, Some(&self.api_token))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::http_status(status.as_u16(), &body));
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}
