use actix_multipart::Multipart;
use actix_web::{delete, get, post, web, HttpResponse, Result as WebResult};
use tracing::error;
use uuid::Uuid;

use crate::api::models::ErrorBody;
use crate::api::multipart::{read_form, FormError};
use crate::backend::{BackendClient, BackendError};
use crate::chat::{Orchestrator, SendError, StagedFile};
use crate::relay::UploadStore;

fn backend_error_response(e: &BackendError) -> HttpResponse {
    match e {
        BackendError::MissingBaseUrl => HttpResponse::InternalServerError().json(ErrorBody::new("Missing backend URL")),
        other => {
            error!("Backend call failed: {}", other);
            HttpResponse::BadGateway().json(ErrorBody::new(other.to_string()))
        }
    }
}

// --- Sessions ---

#[post("")]
pub async fn create_session(orchestrator: web::Data<Orchestrator>) -> WebResult<HttpResponse> {
    let session = orchestrator.store().create();
    Ok(HttpResponse::Created().json(session))
}

#[get("")]
pub async fn list_sessions(orchestrator: web::Data<Orchestrator>) -> WebResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(orchestrator.store().list()))
}

#[get("/{id}")]
pub async fn get_session(
    orchestrator: web::Data<Orchestrator>,
    id: web::Path<Uuid>,
) -> WebResult<HttpResponse> {
    match orchestrator.store().get(id.into_inner()) {
        Some(session) => Ok(HttpResponse::Ok().json(session)),
        None => Ok(HttpResponse::NotFound().json(ErrorBody::new("Session not found"))),
    }
}

/// Multipart body: `text` plus an optional `file`.
#[post("/{id}/messages")]
pub async fn send_message(
    orchestrator: web::Data<Orchestrator>,
    uploads: web::Data<UploadStore>,
    id: web::Path<Uuid>,
    payload: Multipart,
) -> WebResult<HttpResponse> {
    let form = match read_form(payload, uploads.max_bytes()).await {
        Ok(form) => form,
        Err(e @ FormError::TooLarge { .. }) => {
            return Ok(HttpResponse::PayloadTooLarge().json(ErrorBody::new(e.to_string())));
        }
        Err(e) => return Ok(HttpResponse::BadRequest().json(ErrorBody::new(e.to_string()))),
    };

    let text = form.field("text").unwrap_or_default().to_string();
    let staged = form.file.map(|f| StagedFile::new(f.name, f.bytes));

    match orchestrator.send(id.into_inner(), &text, staged).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(outcome)),
        Err(e @ SendError::EmptyInput) => Ok(HttpResponse::BadRequest().json(ErrorBody::new(e.to_string()))),
        Err(e @ SendError::SessionNotFound(_)) => Ok(HttpResponse::NotFound().json(ErrorBody::new(e.to_string()))),
        Err(e @ SendError::SendInProgress(_)) => Ok(HttpResponse::Conflict().json(ErrorBody::new(e.to_string()))),
    }
}

// --- Files ---

#[get("")]
pub async fn list_files(backend: web::Data<BackendClient>) -> WebResult<HttpResponse> {
    match backend.list_files().await {
        Ok(list) => Ok(HttpResponse::Ok().json(serde_json::json!({ "files": list.files }))),
        Err(e) => Ok(backend_error_response(&e)),
    }
}

#[delete("/{filename}")]
pub async fn delete_file(
    backend: web::Data<BackendClient>,
    filename: web::Path<String>,
) -> WebResult<HttpResponse> {
    match backend.delete_file(&filename.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(backend_error_response(&e)),
    }
}

// --- Local uploads ---

#[get("/uploads")]
pub async fn list_uploads(store: web::Data<UploadStore>) -> WebResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list().await))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sessions")
            .service(create_session)
            .service(list_sessions)
            .service(get_session)
            .service(send_message)
    )
    .service(
        web::scope("/files")
            .service(list_files)
            .service(delete_file)
    )
    .service(list_uploads);
}
