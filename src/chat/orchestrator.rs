use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::backend::{
    models::{EnrichmentResponse, SpreadsheetPreview, UploadRoute, VectorQueryRequest, VectorQueryResponse},
    BackendClient, BackendError,
};
use crate::chat::{
    intent::{is_enrichment_request, is_spreadsheet, route_upload},
    models::{ChatMessage, StagedFile},
    render::{enrichment_summary, sanitize_title},
    store::{SessionStore, StoreError},
};
use crate::config::AppConfig;
use crate::llm::models::Message as LlmMessage;
use crate::relay::chat::{soft_reply, ChatRelay, ChatRelayRequest, NO_RESPONSE_REPLY};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("Message text is empty")]
    EmptyInput,
    #[error("Session {0} not found")]
    SessionNotFound(Uuid),
    #[error("A message is already being sent in session {0}")]
    SendInProgress(Uuid),
}

impl From<StoreError> for SendError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => SendError::SessionNotFound(id),
            StoreError::Busy(id) => SendError::SendInProgress(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendPath {
    Enriched,
    Replied,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    pub session_id: Uuid,
    pub path: SendPath,
    pub upload_route: Option<UploadRoute>,
    pub context_chunks: usize,
    pub appended: Vec<ChatMessage>,
    pub title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub system_prompt: String,
    pub title_prompt: String,
    pub context_chunks: usize,
    pub public_base: String,
}

impl OrchestratorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            system_prompt: config.chat.system_prompt.clone(),
            title_prompt: config.chat.title_prompt.clone(),
            context_chunks: config.chat.context_chunks,
            public_base: config.backend.public_base().to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    store: SessionStore,
    backend: BackendClient,
    relay: ChatRelay,
    settings: Arc<OrchestratorSettings>,
}

impl Orchestrator {
    pub fn new(store: SessionStore, backend: BackendClient, relay: ChatRelay, settings: OrchestratorSettings) -> Self {
        Self {
            store,
            backend,
            relay,
            settings: Arc::new(settings),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            SessionStore::new(&config.chat.greeting),
            BackendClient::from_config(&config.backend),
            ChatRelay::from_config(&config.llm),
            OrchestratorSettings::from_config(config),
        )
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Eagerly sends a freshly staged spreadsheet to `upload-csv` so its
    /// columns show up in the logs. Failures are only logged.
    pub async fn preview_spreadsheet(&self, file: &StagedFile) -> Option<SpreadsheetPreview> {
        if !is_spreadsheet(&file.name) {
            return None;
        }
        match self.backend.upload(UploadRoute::UploadCsv, &file.name, &file.bytes).await {
            Ok(body) => {
                let preview: SpreadsheetPreview = serde_json::from_value(body).unwrap_or_default();
                match &preview.columns {
                    Some(columns) => info!("Spreadsheet {} columns: {}", file.name, columns.join(", ")),
                    None => info!("Spreadsheet {} uploaded (no columns found)", file.name),
                }
                Some(preview)
            }
            Err(e) => {
                warn!("Spreadsheet preview upload failed: {}", e);
                None
            }
        }
    }

    /// Runs a full send for `session_id`. Only refusals are errors; every
    /// failure after the user turn is recorded is absorbed into the session.
    pub async fn send(&self, session_id: Uuid, input: &str, file: Option<StagedFile>) -> Result<SendOutcome, SendError> {
        if input.trim().is_empty() {
            return Err(SendError::EmptyInput);
        }

        let _sending = self.store.begin_send(session_id)?;

        let user_message = ChatMessage::user(input, file.as_ref().map(StagedFile::file_ref));
        self.store.append(session_id, user_message.clone())?;

        let mut outcome = SendOutcome {
            session_id,
            path: SendPath::Replied,
            upload_route: None,
            context_chunks: 0,
            appended: vec![user_message],
            title: None,
        };

        let file_name = file.as_ref().map(|f| f.name.as_str());
        let enrichment = is_enrichment_request(input, file_name);

        if let Some(file) = &file {
            let route = route_upload(&file.name, enrichment);
            outcome.upload_route = Some(route);

            if let Some(summary) = self.upload_step(route, file).await {
                let message = ChatMessage::assistant(summary);
                self.store.append(session_id, message.clone())?;
                outcome.appended.push(message);
                outcome.path = SendPath::Enriched;
                return Ok(outcome);
            }
        }

        let snapshot = self.store.get(session_id).ok_or(SendError::SessionNotFound(session_id))?;
        let history: Vec<LlmMessage> = snapshot.messages.iter().map(ChatMessage::to_llm).collect();
        let first_turn = snapshot.user_turns() == 1;

        let chunks = self.context_step(input, file_name.unwrap_or_default()).await;
        outcome.context_chunks = chunks.len();

        let request = ChatRelayRequest {
            messages: history,
            preprompt: Some(self.settings.system_prompt.clone()),
            context: (!chunks.is_empty()).then(|| chunks.join("\n\n")),
        };
        let reply = match self.relay.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Reply generation failed: {}", e);
                soft_reply(&e)
            }
        };

        let message = ChatMessage::assistant(reply);
        self.store.append(session_id, message.clone())?;
        outcome.appended.push(message);

        if first_turn {
            if let Some(title) = self.title_step(input).await {
                if self.store.rename_once(session_id, &title)? {
                    info!("Session {} titled {:?}", session_id, title);
                    outcome.title = Some(title);
                }
            }
        }

        Ok(outcome)
    }

    async fn upload_step(&self, route: UploadRoute, file: &StagedFile) -> Option<String> {
        let body = match self.backend.upload(route, &file.name, &file.bytes).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Upload of {} failed: {}", file.name, e);
                return None;
            }
        };
        info!("File {} uploaded to {}", file.name, route.path());

        if route != UploadRoute::UpdateAttendeeList {
            return None;
        }
        match serde_json::from_value::<EnrichmentResponse>(body) {
            Ok(response) => Some(enrichment_summary(&response, &self.settings.public_base)),
            Err(e) => {
                warn!("Unexpected enrichment response: {}", e);
                None
            }
        }
    }

    async fn context_step(&self, input: &str, filename: &str) -> Vec<String> {
        let request = VectorQueryRequest {
            filename: filename.to_string(),
            query: input.to_string(),
        };
        let parsed = self
            .backend
            .vector_query(&request)
            .await
            .and_then(|body: Value| serde_json::from_value::<VectorQueryResponse>(body).map_err(|e| BackendError::Parse(e.to_string())));

        match parsed {
            Ok(response) => response.chunks.into_iter().take(self.settings.context_chunks).collect(),
            Err(BackendError::MissingBaseUrl) => Vec::new(),
            Err(e) => {
                warn!("Vector search failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn title_step(&self, input: &str) -> Option<String> {
        let request = ChatRelayRequest {
            messages: vec![LlmMessage::user(input)],
            preprompt: Some(self.settings.title_prompt.clone()),
            context: None,
        };
        match self.relay.complete(&request).await {
            Ok(raw) if raw != NO_RESPONSE_REPLY => {
                let title = sanitize_title(&raw);
                (!title.is_empty()).then_some(title)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Title generation failed: {}", e);
                None
            }
        }
    }
}
