pub mod client;
pub mod models;

pub use client::BackendClient;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Missing backend URL")]
    MissingBaseUrl,
    #[error("Network Error: {0}")]
    Network(String),
    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Parse Error: {0}")]
    Parse(String),
}
