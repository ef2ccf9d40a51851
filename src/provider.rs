use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::config::ProviderConfig;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned {status}: {detail}")]
    Api { status: u16, detail: String },
    #[error("provider response missing content")]
    MissingContent,
    #[error("provider response was not valid JSON: {0}")]
    Parse(String),
}

/// One content draft as returned by the model. Missing fields degrade to
/// defaults rather than failing the parse.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Clone)]
pub struct ProviderClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f64,
}

impl ProviderClient {
    /// Requires an API key in the environment; returns None when the
    /// engine should run in template-only mode.
    pub fn from_config(config: &ProviderConfig) -> Option<Self> {
        let api_key = env::var("OPENAI_API_KEY").ok()?;
        let api_base = env::var("OPENAI_API_BASE").unwrap_or_else(|_| config.api_base.clone());
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| config.model.clone());
        Self::new(
            api_key,
            api_base,
            model,
            config.temperature,
            Duration::from_millis(config.timeout_ms),
        )
        .ok()
    }

    pub fn new(
        api_key: String,
        api_base: String,
        model: String,
        temperature: f64,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            api_base,
            model,
            temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single-platform draft: expects one JSON object in the reply body.
    pub async fn draft(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: Option<u32>,
        deadline: Option<Duration>,
    ) -> Result<ProviderDraft, ProviderError> {
        let payload = self
            .complete(system_prompt, user_prompt, max_tokens, deadline)
            .await?;
        serde_json::from_str(&payload).map_err(|err| ProviderError::Parse(err.to_string()))
    }

    /// Batched draft: expects a JSON object keyed by platform key.
    pub async fn draft_many(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: Option<u32>,
        deadline: Option<Duration>,
    ) -> Result<HashMap<String, ProviderDraft>, ProviderError> {
        let payload = self
            .complete(system_prompt, user_prompt, max_tokens, deadline)
            .await?;
        serde_json::from_str(&payload).map_err(|err| ProviderError::Parse(err.to_string()))
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: Option<u32>,
        deadline: Option<Duration>,
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/chat/completions",
            self.api_base.trim_end_matches('/')
        );
        let request = ChatRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
        };

        let mut builder = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request);
        if let Some(deadline) = deadline {
            builder = builder.timeout(deadline);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                detail: detail.trim().to_string(),
            });
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .first()
            .ok_or(ProviderError::MissingContent)?
            .message
            .content
            .trim()
            .to_string();

        extract_json(&content).ok_or(ProviderError::MissingContent)
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// Models wrap JSON in prose or code fences often enough that we cut to
/// the outermost braces before parsing.
fn extract_json(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }
    Some(text[start..=end].to_string())
}
