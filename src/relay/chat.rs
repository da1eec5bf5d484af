use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::LlmConfig;
use crate::llm::{
    models::{ChatOptions, Message},
    LlmError, LlmProvider, ProviderFactory,
};

pub const MISSING_KEY_REPLY: &str = "[Missing API key]";
pub const NO_RESPONSE_REPLY: &str = "[No response]";
pub const CONNECT_ERROR_REPLY: &str = "[Error connecting to Claude]";
pub const CONTEXT_PREFIX: &str = "Here's some relevant context:";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRelayRequest {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub preprompt: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRelayReply {
    pub reply: String,
}

pub fn soft_reply(err: &LlmError) -> String {
    match err {
        LlmError::MissingApiKey => MISSING_KEY_REPLY.to_string(),
        LlmError::Api(message) => format!("[Claude Error] {}", message),
        LlmError::Network(_) | LlmError::Parse(_) => CONNECT_ERROR_REPLY.to_string(),
    }
}

pub fn with_context(messages: &[Message], context: Option<&str>) -> Vec<Message> {
    let mut relayed = Vec::with_capacity(messages.len() + 1);
    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        relayed.push(Message::user(format!("{}\n\n{}", CONTEXT_PREFIX, context)));
    }
    relayed.extend(messages.iter().cloned());
    relayed
}

#[derive(Clone)]
pub struct ChatRelay {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl ChatRelay {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        let provider = ProviderFactory::create_default(config);
        if provider.is_none() {
            warn!("No LLM API key configured; chat replies will report a missing key");
        }
        Self::new(provider)
    }

    /// Returns the reply text, or the no-response sentinel when the model
    /// produced no text block.
    pub async fn complete(&self, request: &ChatRelayRequest) -> Result<String, LlmError> {
        let provider = match &self.provider {
            Some(p) => p,
            None => {
                error!("Chat relay called without an API key");
                return Err(LlmError::MissingApiKey);
            }
        };

        let messages = with_context(&request.messages, request.context.as_deref());
        let options = ChatOptions {
            system_prompt: request.preprompt.clone(),
        };

        info!("Relaying {} messages to {}", messages.len(), provider.name());
        let response = provider.chat(&messages, options).await?;

        if response.content.is_empty() {
            Ok(NO_RESPONSE_REPLY.to_string())
        } else {
            Ok(response.content)
        }
    }

    /// Like [`ChatRelay::complete`] but never fails: errors become reply text.
    pub async fn relay(&self, request: &ChatRelayRequest) -> ChatRelayReply {
        match self.complete(request).await {
            Ok(reply) => ChatRelayReply { reply },
            Err(e) => {
                error!("Chat relay failed: {}", e);
                ChatRelayReply { reply: soft_reply(&e) }
            }
        }
    }
}
