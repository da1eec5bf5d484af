use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::LlmConfig;
use crate::llm::{models::{ChatOptions, ChatResponse, Message}, LlmError, LlmProvider};

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    api_version: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: "2023-06-01".to_string(),
            model,
            max_tokens: 1000,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            api_version: config.api_version.clone(),
            max_tokens: config.max_tokens,
            ..Self::new(config.api_key.clone(), config.api_base.clone(), config.model.clone())
        }
    }
}

/// Pulls `error.message` out of an Anthropic error payload.
fn upstream_error_message(json: &Value) -> Option<String> {
    let error = json.get("error")?;
    match error.get("message").and_then(Value::as_str) {
        Some(message) => Some(message.to_string()),
        None => Some(error.to_string()),
    }
}

fn first_text_block(json: &Value) -> String {
    json["content"]
        .as_array()
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|b| b["type"].as_str().map_or(true, |t| t == "text"))
                .and_then(|b| b["text"].as_str())
        })
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn chat(&self, messages: &[Message], options: ChatOptions) -> Result<ChatResponse, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": options.system_prompt.as_deref().unwrap_or(""),
            "messages": messages,
        });

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Anthropic responded with status {}", status);

        let json: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        // Error payloads are reported even when they arrive with a 2xx status
        if let Some(message) = upstream_error_message(&json) {
            return Err(LlmError::Api(message));
        }
        if !status.is_success() {
            return Err(LlmError::Api(format!("Anthropic Error {}", status)));
        }

        Ok(ChatResponse {
            content: first_text_block(&json),
        })
    }
}
