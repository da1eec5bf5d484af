pub mod anthropic;
pub mod models;

use anthropic::AnthropicProvider;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::LlmConfig;
use models::{ChatOptions, ChatResponse, Message};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Network Error: {0}")]
    Network(String),
    /// The upstream answered with an error payload; holds its message verbatim.
    #[error("API Error: {0}")]
    Api(String),
    #[error("Parse Error: {0}")]
    Parse(String),
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn chat(&self, messages: &[Message], options: ChatOptions) -> Result<ChatResponse, LlmError>;
}

pub struct ProviderFactory;

impl ProviderFactory {
    /// Returns `None` when no API key is configured so callers can answer
    /// with the missing-key reply without touching the network.
    pub fn create_default(config: &LlmConfig) -> Option<Arc<dyn LlmProvider>> {
        if config.api_key.trim().is_empty() {
            return None;
        }
        Some(Arc::new(AnthropicProvider::from_config(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_requires_api_key() {
        let mut config = LlmConfig::default();
        assert!(ProviderFactory::create_default(&config).is_none());

        config.api_key = "   ".to_string();
        assert!(ProviderFactory::create_default(&config).is_none());

        config.api_key = "sk-test".to_string();
        let provider = ProviderFactory::create_default(&config).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }
}
