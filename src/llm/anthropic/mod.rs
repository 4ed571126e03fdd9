use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http_client::build_provider_client;
use super::scrub::api_error;
use super::traits::{ChatFuture, ChatMessage, ChatProvider, MessageRole};
use crate::error::LlmError;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;
const PROVIDER_NAME: &str = "anthropic";

/// Anthropic Messages API client.
pub struct AnthropicProvider {
    api_key: Option<String>,
    model: String,
    messages_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    content: Vec<ResponseContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<&str>, model: Option<&str>) -> Self {
        Self::with_base_url(api_key, model, None)
    }

    pub fn with_base_url(api_key: Option<&str>, model: Option<&str>, base_url: Option<&str>) -> Self {
        let base = base_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map_or(DEFAULT_BASE_URL, |u| u.trim_end_matches('/'));
        Self {
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string),
            model: model
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_MODEL)
                .to_string(),
            messages_url: format!("{base}/v1/messages"),
            client: build_provider_client(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request<'a>(&'a self, system: &'a str, messages: &'a [ChatMessage]) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: messages
                .iter()
                .map(|m| Message {
                    role: match m.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "assistant",
                    },
                    content: &m.content,
                })
                .collect(),
        }
    }

    fn extract_text(response: ChatResponse) -> Option<String> {
        let text = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text),
                ResponseContentBlock::Unsupported => None,
            })
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() { None } else { Some(text) }
    }

    async fn call_api(&self, system: &str, messages: &[ChatMessage]) -> anyhow::Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| LlmError::Auth {
            provider: PROVIDER_NAME.to_string(),
        })?;

        let request = self.build_request(system, messages);
        let response = self
            .client
            .post(&self.messages_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| LlmError::Request {
                provider: PROVIDER_NAME.to_string(),
                message: err.without_url().to_string(),
            })?;

        if !response.status().is_success() {
            return Err(api_error(PROVIDER_NAME, response).await);
        }

        let body: ChatResponse = response.json().await.map_err(|err| LlmError::Request {
            provider: PROVIDER_NAME.to_string(),
            message: format!("invalid response body: {err}"),
        })?;

        Self::extract_text(body).ok_or_else(|| {
            LlmError::EmptyResponse {
                provider: PROVIDER_NAME.to_string(),
            }
            .into()
        })
    }
}

impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn chat<'a>(&'a self, system: &'a str, messages: &'a [ChatMessage]) -> ChatFuture<'a> {
        Box::pin(self.call_api(system, messages))
    }
}
