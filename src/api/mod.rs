pub mod models;
pub mod multipart;
pub mod routes;
pub mod routes_relay;

use actix_web::{web, HttpResponse, Responder};

use crate::backend::BackendClient;
use crate::chat::{Orchestrator, OrchestratorSettings, SessionStore};
use crate::config::AppConfig;
use crate::relay::{ChatRelay, UploadStore, VectorRelay};

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "healthy"}))
}

/// Shared handler state, built once and cloned into every worker.
#[derive(Clone)]
pub struct AppServices {
    pub chat_relay: web::Data<ChatRelay>,
    pub vector_relay: web::Data<VectorRelay>,
    pub uploads: web::Data<UploadStore>,
    pub orchestrator: web::Data<Orchestrator>,
    pub backend: web::Data<BackendClient>,
}

impl AppServices {
    pub fn new(orchestrator: Orchestrator, chat_relay: ChatRelay, uploads: UploadStore) -> Self {
        let backend = orchestrator.backend().clone();
        Self {
            chat_relay: web::Data::new(chat_relay),
            vector_relay: web::Data::new(VectorRelay::new(backend.clone())),
            uploads: web::Data::new(uploads),
            orchestrator: web::Data::new(orchestrator),
            backend: web::Data::new(backend),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let chat_relay = ChatRelay::from_config(&config.llm);
        let orchestrator = Orchestrator::new(
            SessionStore::new(&config.chat.greeting),
            BackendClient::from_config(&config.backend),
            chat_relay.clone(),
            OrchestratorSettings::from_config(config),
        );
        Self::new(orchestrator, chat_relay, UploadStore::from_config(&config.uploads))
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.chat_relay.clone())
            .app_data(self.vector_relay.clone())
            .app_data(self.uploads.clone())
            .app_data(self.orchestrator.clone())
            .app_data(self.backend.clone())
            .route("/health", web::get().to(health))
            .service(
                web::scope("/api")
                    .configure(routes_relay::configure)
                    .configure(routes::configure),
            );
    }
}
