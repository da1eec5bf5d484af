use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse, Result as WebResult};
use tracing::error;

use crate::api::models::{ErrorBody, StoredFile, UploadResponse};
use crate::api::multipart::{read_form, FormError};
use crate::backend::BackendError;
use crate::relay::{ChatRelay, ChatRelayRequest, ReadFileRequest, UploadError, UploadStore, VectorRelay};

/// Always answers 200; failures come back as reply text.
#[post("/claude")]
pub async fn claude(
    relay: web::Data<ChatRelay>,
    req: web::Json<ChatRelayRequest>,
) -> WebResult<HttpResponse> {
    let reply = relay.relay(&req.into_inner()).await;
    Ok(HttpResponse::Ok().json(reply))
}

#[post("/readfile")]
pub async fn readfile(
    relay: web::Data<VectorRelay>,
    req: web::Json<ReadFileRequest>,
) -> WebResult<HttpResponse> {
    match relay.query(req.into_inner()).await {
        Ok(body) => Ok(HttpResponse::Ok().json(body)),
        Err(BackendError::MissingBaseUrl) => {
            Ok(HttpResponse::InternalServerError().json(ErrorBody::new("Missing backend URL")))
        }
        Err(_) => Ok(HttpResponse::InternalServerError().json(ErrorBody::new("Failed to fetch file data"))),
    }
}

#[post("/upload")]
pub async fn upload(
    store: web::Data<UploadStore>,
    payload: Multipart,
) -> WebResult<HttpResponse> {
    let form = match read_form(payload, store.max_bytes()).await {
        Ok(form) => form,
        Err(e @ FormError::TooLarge { .. }) => {
            return Ok(HttpResponse::PayloadTooLarge().json(ErrorBody::new(e.to_string())));
        }
        Err(e) => {
            error!("Upload Error: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ErrorBody::new("Upload failed")));
        }
    };

    let file = match &form.file {
        Some(file) => file,
        None => return Ok(HttpResponse::BadRequest().json(ErrorBody::new(UploadError::MissingFile.to_string()))),
    };

    match store.save(&file.name, &file.bytes, form.field("topic")).await {
        Ok(record) => Ok(HttpResponse::Ok().json(UploadResponse {
            success: true,
            file: StoredFile {
                name: record.name,
                stored_as: record.stored_as,
                topic: record.topic,
            },
        })),
        Err(e @ UploadError::TooLarge { .. }) => Ok(HttpResponse::PayloadTooLarge().json(ErrorBody::new(e.to_string()))),
        Err(e) => {
            error!("Upload Error: {}", e);
            Ok(HttpResponse::InternalServerError().json(ErrorBody::new("Upload failed")))
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(claude).service(readfile).service(upload);
}
