use super::anthropic::AnthropicProvider;
use super::traits::ChatProvider;
use crate::config::LlmConfig;
use crate::error::LlmError;

/// Build the chat provider named by `[llm] provider`.
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn ChatProvider>, LlmError> {
    match config.provider.trim().to_lowercase().as_str() {
        "" | "anthropic" | "claude" => Ok(Box::new(AnthropicProvider::with_base_url(
            config.api_key.as_deref(),
            config.model.as_deref(),
            config.base_url.as_deref(),
        ))),
        other => Err(LlmError::UnknownProvider(other.to_string())),
    }
}
