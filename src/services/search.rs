// src/services/search.rs

//! Search-count client.
//!
//! Issues one Custom Search request per domain and classifies the reply
//! into a [`SearchOutcome`]. No retries are attempted here; the harvest
//! driver decides what to do with each outcome.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::Credentials;
use crate::error::Result;
use crate::models::{SearchConfig, SearchOutcome};
use crate::services::QueryBuilder;
use crate::utils::http::create_async_client;

/// Anything that can report a result count for a domain.
#[async_trait]
pub trait ResultCounter: Send + Sync {
    /// Count matching pages for `domain`. Never fails; failures are outcomes.
    async fn count(&self, domain: &str) -> SearchOutcome;
}

/// Client for the Custom Search JSON API.
pub struct SearchClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
    results_per_query: String,
    queries: QueryBuilder,
}

impl SearchClient {
    /// Create a client with its own HTTP connection pool.
    pub fn new(config: &SearchConfig, credentials: Credentials) -> Result<Self> {
        let client = create_async_client(config)?;
        Ok(Self::with_client(client, config, credentials))
    }

    /// Create a client reusing an existing HTTP client.
    pub fn with_client(client: Client, config: &SearchConfig, credentials: Credentials) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            credentials,
            results_per_query: config.results_per_query.to_string(),
            queries: QueryBuilder::new(config.cutoff_date),
        }
    }

    /// Query string sent for `domain`.
    pub fn query_for(&self, domain: &str) -> String {
        self.queries.build(domain)
    }
}

#[async_trait]
impl ResultCounter for SearchClient {
    async fn count(&self, domain: &str) -> SearchOutcome {
        let query = self.query_for(domain);
        log::debug!("Searching: {}", query);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.credentials.api_key.as_str()),
                ("cx", self.credentials.engine_id.as_str()),
                ("q", query.as_str()),
                ("num", self.results_per_query.as_str()),
            ])
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            // The request URL carries the API key.
            Err(e) => return SearchOutcome::TransientFailure(e.without_url().to_string()),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return classify_response(status, "");
        }

        match response.text().await {
            Ok(body) => classify_response(status, &body),
            Err(e) => SearchOutcome::TransientFailure(e.without_url().to_string()),
        }
    }
}

/// Classify an HTTP reply from the search API.
///
/// - `200`: `searchInformation.totalResults`, or `0` when absent
/// - `429` / `403`: quota exhausted
/// - anything else: `0`
pub fn classify_response(status: StatusCode, body: &str) -> SearchOutcome {
    match status {
        StatusCode::OK => parse_total_results(body),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN => SearchOutcome::QuotaExceeded,
        _ => SearchOutcome::Count(0),
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "searchInformation", default)]
    search_information: Option<SearchInformation>,
}

#[derive(Debug, Deserialize)]
struct SearchInformation {
    #[serde(rename = "totalResults", default)]
    total_results: Option<TotalResults>,
}

/// The API reports the total as a decimal string; plain numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalResults {
    Number(u64),
    Text(String),
}

fn parse_total_results(body: &str) -> SearchOutcome {
    let response: SearchResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => return SearchOutcome::TransientFailure(format!("invalid JSON body: {e}")),
    };

    let total = response
        .search_information
        .and_then(|info| info.total_results);

    match total {
        None => SearchOutcome::Count(0),
        Some(TotalResults::Number(n)) => SearchOutcome::Count(n),
        Some(TotalResults::Text(text)) => match text.trim().parse::<u64>() {
            Ok(n) => SearchOutcome::Count(n),
            Err(_) => SearchOutcome::TransientFailure(format!("invalid totalResults: {text:?}")),
        },
    }
}
