use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use crate::backend::{models::VectorQueryRequest, BackendClient, BackendError};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadFileRequest {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub question: String,
}

#[derive(Clone)]
pub struct VectorRelay {
    backend: BackendClient,
}

impl VectorRelay {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    pub async fn query(&self, request: ReadFileRequest) -> Result<Value, BackendError> {
        let forwarded = VectorQueryRequest {
            filename: request.filename,
            query: request.question,
        };
        match self.backend.forward_vector_query(&forwarded).await {
            Ok(body) => Ok(body),
            Err(e) => {
                error!("ReadFile relay failed: {}", e);
                Err(e)
            }
        }
    }
}
