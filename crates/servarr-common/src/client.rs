//! Typed HTTP client for the Sonarr/Radarr v3 REST API
//!
//! Both backends expose the same `/api/v3` surface authenticated with an
//! `X-Api-Key` header, so a single client type serves either one. Each call is
//! exactly one attempt: no retries, no backoff.

use crate::error::{Result, ServarrError};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Header carrying the API key on every request
const API_KEY_HEADER: &str = "X-Api-Key";

/// Maximum number of body characters kept in a remote error
const BODY_EXCERPT_LEN: usize = 200;

/// HTTP client bound to one backend instance
///
/// Owns a pooled `reqwest::Client` created once for the process lifetime.
/// Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct ArrClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl ArrClient {
    /// Create a client for the backend at `base_url` with the given API key
    /// and per-request timeout in seconds.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ServarrError::transport_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v3/{}", self.base_url, path)
    }

    /// GET a path, optionally with query parameters
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let request = self.http.get(self.endpoint(path)).query(query);
        self.execute(request, false).await
    }

    /// POST a JSON body
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let request = self.http.post(self.endpoint(path)).json(body);
        self.execute(request, false).await
    }

    /// PUT a JSON body
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        let request = self.http.put(self.endpoint(path)).json(body);
        self.execute(request, false).await
    }

    /// DELETE a path; an empty response body yields an empty object
    pub async fn delete(&self, path: &str) -> Result<Value> {
        let request = self.http.delete(self.endpoint(path));
        self.execute(request, true).await
    }

    async fn execute(&self, request: reqwest::RequestBuilder, allow_empty: bool) -> Result<Value> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServarrError::transport_with_source("Request timeout", e)
                } else if e.is_connect() {
                    ServarrError::transport_with_source("Connection failed", e)
                } else {
                    ServarrError::transport_with_source("Request failed", e)
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ServarrError::transport_with_source("Failed to read response body", e))?;

        if !status.is_success() {
            error!(status = status.as_u16(), "Backend returned an error status");
            let excerpt: String = text.chars().take(BODY_EXCERPT_LEN).collect();
            return Err(ServarrError::remote(status.as_u16(), excerpt));
        }

        debug!(status = status.as_u16(), bytes = text.len(), "Request successful");

        if allow_empty && text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }

        serde_json::from_str(&text)
            .map_err(|e| ServarrError::decode_with_source("Response body was not valid JSON", e))
    }
}
