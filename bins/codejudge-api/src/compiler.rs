//! Execution API client
//!
//! Forwards a single-file submission to the compiler-as-a-service endpoint
//! and hands back its JSON untouched. One request, no retry, no timeout
//! beyond the HTTP client's defaults.

use codejudge_common::config::CompilerConfig;
use codejudge_common::types::ExecutionPayload;
use reqwest::Client;
use serde_json::Value;

use crate::error::ProxyError;

#[derive(Clone)]
pub struct CompilerClient {
    http: Client,
    config: CompilerConfig,
}

impl CompilerClient {
    pub fn new(http: Client, config: CompilerConfig) -> Self {
        Self { http, config }
    }

    pub async fn run(&self, payload: &ExecutionPayload) -> Result<Value, ProxyError> {
        let response = self
            .http
            .post(&self.config.url)
            .header("x-rapidapi-host", &self.config.rapidapi_host)
            .header("x-rapidapi-key", &self.config.rapidapi_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(&body)
                .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// `message` field of an upstream JSON error body, if there is one
fn upstream_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}
