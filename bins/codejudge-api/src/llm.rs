//! Chat-completion client for the review API (OpenAI-compatible, e.g. Groq)

use codejudge_common::config::ReviewConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProxyError;

pub const TEMPERATURE: f32 = 0.4;
pub const MAX_TOKENS: u32 = 4096;

#[derive(Clone)]
pub struct ReviewClient {
    http: Client,
    config: ReviewConfig,
}

/// Model output plus the token count the provider reported
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub total_tokens: u64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    total_tokens: u64,
}

impl ReviewClient {
    pub fn new(http: Client, config: ReviewConfig) -> Self {
        Self { http, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Ask for a JSON-object completion of `user` under `system`
    pub async fn complete(&self, system: &str, user: &str) -> Result<Completion, ProxyError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .http
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = provider_error(&body)
                .map(|m| format!("HTTP {}: {}", status.as_u16(), m))
                .unwrap_or_else(|| format!("HTTP {}: {}", status, body));
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let chat: ChatResponse = serde_json::from_slice(&bytes)?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
            .ok_or(ProxyError::EmptyCompletion)?;

        Ok(Completion {
            content,
            total_tokens: chat.usage.map(|u| u.total_tokens).unwrap_or(0),
        })
    }
}

/// `error.message` from an OpenAI-style error body
fn provider_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
}
