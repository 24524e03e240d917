// src/services/upstream.rs
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::message::Prompt;
use crate::services::extract::{Completion, extract_completion, reported_error};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("no upstream API key configured")]
    NotConfigured,

    #[error("upstream rate limited the request")]
    RateLimited,

    #[error("upstream unavailable (status {status})")]
    Unavailable { status: StatusCode },

    #[error("upstream rejected the request (status {status}): {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("upstream reported an error: {0}")]
    Reported(String),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("upstream body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("upstream returned no reply text")]
    EmptyReply,
}

#[derive(Debug, Serialize)]
pub struct UpstreamMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
pub struct UpstreamRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<UpstreamMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    max_body_bytes: usize,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.upstream_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_body_bytes: config.max_upstream_body_bytes,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_request<'a>(&'a self, prompt: &'a Prompt) -> UpstreamRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !prompt.system.is_empty() {
            messages.push(UpstreamMessage {
                role: "system",
                content: &prompt.system,
            });
        }
        messages.push(UpstreamMessage {
            role: "user",
            content: &prompt.message,
        });

        UpstreamRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// One outbound call, no retries.
    #[tracing::instrument(skip_all, fields(model = %self.model))]
    pub async fn complete(&self, prompt: &Prompt) -> Result<Completion, UpstreamError> {
        let api_key = self.api_key.as_deref().ok_or(UpstreamError::NotConfigured)?;

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.build_request(prompt))
            .send()
            .await?;

        // The status alone decides 429/5xx; the body may be truncated or never arrive.
        let status = response.status();
        tracing::debug!(%status, "upstream responded");

        match classify_status(status) {
            Ok(()) => {}
            Err(UpstreamError::Rejected { status, .. }) => {
                let detail = self.read_body(response).await.unwrap_or_default();
                return Err(UpstreamError::Rejected {
                    status,
                    body: truncate(&detail, 500),
                });
            }
            Err(err) => return Err(err),
        }

        let body = self.read_body(response).await?;
        parse_completion(&body)
    }

    /// Reads the body chunk by chunk, giving up once it passes `max_body_bytes`.
    async fn read_body(&self, mut response: reqwest::Response) -> Result<String, UpstreamError> {
        let limit = self.max_body_bytes;
        if response.content_length().is_some_and(|len| len > limit as u64) {
            return Err(UpstreamError::TooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(UpstreamError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Maps a non-success upstream status onto the error that decides the
/// downstream status code. `Rejected` carries an empty body; the caller fills it in for the log.
pub fn classify_status(status: StatusCode) -> Result<(), UpstreamError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(UpstreamError::RateLimited);
    }
    if status.is_server_error() {
        return Err(UpstreamError::Unavailable { status });
    }
    if !status.is_success() {
        return Err(UpstreamError::Rejected {
            status,
            body: String::new(),
        });
    }
    Ok(())
}

pub fn parse_completion(body: &str) -> Result<Completion, UpstreamError> {
    let payload: Value = serde_json::from_str(body)?;
    if let Some(completion) = extract_completion(&payload) {
        return Ok(completion);
    }
    match reported_error(&payload) {
        Some(message) => Err(UpstreamError::Reported(message)),
        None => Err(UpstreamError::EmptyReply),
    }
}

fn truncate(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
