use reqwest::{multipart, Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::backend::{
    models::{FileListResponse, UploadRoute, VectorQueryRequest},
    BackendError,
};
use crate::config::BackendConfig;

/// HTTP client for the external document backend (uploads, vector search,
/// file management). Cheap to clone.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Option<String>,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        Self {
            client: Client::new(),
            base_url: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn url(&self, path: &str) -> Result<String, BackendError> {
        let base = self.base_url.as_deref().ok_or(BackendError::MissingBaseUrl)?;
        Ok(format!("{}/{}", base, path.trim_start_matches('/')))
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }
        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Fetches the backend root. Used as a reachability probe at startup.
    pub async fn ping(&self) -> Result<Value, BackendError> {
        let response = self
            .client
            .get(self.url("")?)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    /// Posts a single multipart `file` field to the given upload endpoint.
    pub async fn upload(&self, route: UploadRoute, file_name: &str, bytes: &[u8]) -> Result<Value, BackendError> {
        let url = self.url(route.path())?;
        info!("Uploading {} ({} bytes) to {}", file_name, bytes.len(), route.path());

        let part = multipart::Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    /// Runs a vector query and requires a 2xx answer.
    pub async fn vector_query(&self, request: &VectorQueryRequest) -> Result<Value, BackendError> {
        let response = self
            .client
            .post(self.url("vector-query")?)
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    /// Like [`BackendClient::vector_query`] but accepts any status as long as the body is JSON.
    pub async fn forward_vector_query(&self, request: &VectorQueryRequest) -> Result<Value, BackendError> {
        let response = self
            .client
            .post(self.url("vector-query")?)
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        debug!("vector-query answered {}", response.status());
        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    pub async fn list_files(&self) -> Result<FileListResponse, BackendError> {
        let response = self
            .client
            .get(self.url("list-files")?)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    pub async fn delete_file(&self, filename: &str) -> Result<(), BackendError> {
        let mut url = Url::parse(&self.url("delete-file")?).map_err(|e| BackendError::Network(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Network("backend URL cannot carry a path".to_string()))?
            .push(filename);

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }
        info!("Deleted backend file {}", filename);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_base_url_is_unconfigured() {
        let client = BackendClient::new("   ");
        assert!(!client.is_configured());
        assert!(matches!(client.url("list-files"), Err(BackendError::MissingBaseUrl)));
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let client = BackendClient::new("https://backend.example/");
        assert_eq!(client.url("/vector-query").unwrap(), "https://backend.example/vector-query");
        assert_eq!(client.url("").unwrap(), "https://backend.example/");
    }
}
