//! HTTP fetcher for the DayCache autocomplete endpoint
//!
//! `POST {base_url}/autocomplete` with `{"content": "..."}`; the backend
//! answers `{"suggestions": ["suffix", ...]}` and the first entry wins.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::error::FetchError;
use super::fetcher::SuggestionFetcher;
use super::types::{Query, SuggestionResult};
use crate::config::ApiConfig;
use crate::error::ConfigError;

const AUTOCOMPLETE_PATH: &str = "autocomplete";

#[derive(Serialize)]
struct AutocompleteRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct AutocompleteResponse {
    #[serde(default)]
    suggestions: Option<Vec<String>>,
}

/// Fetches suggestions over HTTP with reqwest
#[derive(Debug, Clone)]
pub struct HttpSuggestionFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpSuggestionFetcher {
    /// Build a fetcher with the configured base URL and request timeout
    pub fn from_config(config: &ApiConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: autocomplete_url(base_url),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SuggestionFetcher for HttpSuggestionFetcher {
    async fn fetch(
        &self,
        query: Query,
        cancel: CancellationToken,
    ) -> Result<SuggestionResult, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let request = self
            .client
            .post(&self.url)
            .json(&AutocompleteRequest {
                content: query.as_str(),
            })
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            response = request => response.map_err(|e| FetchError::Network(e.to_string()))?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            body = response.text() => body.map_err(|e| FetchError::Network(e.to_string()))?,
        };

        parse_autocomplete_body(&body)
    }
}

fn autocomplete_url(base_url: &str) -> String {
    format!("{}/{}", base_url.trim().trim_end_matches('/'), AUTOCOMPLETE_PATH)
}

/// Decode an autocomplete response body
///
/// A missing, null or empty list, or an empty first suggestion, means
/// there is nothing to show.
pub fn parse_autocomplete_body(body: &str) -> Result<SuggestionResult, FetchError> {
    let response: AutocompleteResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    Ok(response
        .suggestions
        .and_then(|suggestions| suggestions.into_iter().next())
        .filter(|suggestion| !suggestion.is_empty()))
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
