//! Translation of demand descriptions into English

use crate::config::DemandBranchConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "Translate the user's text into a short English phrase suitable \
for a git branch name. Reply with the phrase only, no quotes or punctuation.";

/// Turns free text into English
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text`
    async fn translate(&self, text: &str) -> Result<String>;
}

/// Returns the text unchanged (no API configured)
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

/// OpenAI-compatible chat-completions translator
#[derive(Debug, Clone)]
pub struct ChatTranslator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatTranslator {
    /// Create a translator for the given endpoint
    pub fn new(api_key: &str, base_url: Option<&str>, model: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("branchflow")
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Translate(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        })
    }

    /// Build from the demand config, `None` when no API key is configured
    pub fn from_config(config: &DemandBranchConfig) -> Result<Option<Self>> {
        match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {
                Self::new(key, config.base_url.as_deref(), config.model.as_deref()).map(Some)
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl Translator for ChatTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: 0.0,
        };

        debug!(%url, model = %self.model, "Translating demand description");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Translate(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Translate(format!("HTTP {status}: {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Translate(format!("failed to parse response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Translate("empty response".to_string()))
    }
}
