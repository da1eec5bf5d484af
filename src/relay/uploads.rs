use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::UploadsConfig;

pub const DEFAULT_TOPIC: &str = "general";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("File exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Ledger Error: {0}")]
    Ledger(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub name: String,
    pub stored_as: String,
    pub uploaded_at: DateTime<Utc>,
    pub topic: String,
}

/// Local upload directory plus its JSON ledger. Ledger writes are serialized.
pub struct UploadStore {
    dir: PathBuf,
    metadata_path: PathBuf,
    max_bytes: usize,
    ledger_lock: Mutex<()>,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, metadata_file: &str, max_bytes: usize) -> Self {
        let dir = dir.into();
        Self {
            metadata_path: dir.join(metadata_file),
            dir,
            max_bytes,
            ledger_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &UploadsConfig) -> Self {
        Self::new(&config.dir, &config.metadata_file, config.max_bytes)
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A ledger failure is logged; the upload itself still succeeds.
    pub async fn save(&self, original_name: &str, bytes: &[u8], topic: Option<&str>) -> Result<UploadRecord, UploadError> {
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge { limit: self.max_bytes });
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let stored_as = stored_name_for(original_name);
        tokio::fs::write(self.dir.join(&stored_as), bytes).await?;
        info!("Stored upload {} as {}", original_name, stored_as);

        let record = UploadRecord {
            name: original_name.to_string(),
            stored_as,
            uploaded_at: Utc::now(),
            topic: normalize_topic(topic),
        };

        if let Err(e) = self.append_record(&record).await {
            error!("Failed to record upload metadata: {}", e);
        }

        Ok(record)
    }

    pub async fn list(&self) -> Vec<UploadRecord> {
        let _guard = self.ledger_lock.lock().await;
        self.read_records().await
    }

    async fn read_records(&self) -> Vec<UploadRecord> {
        self.load_ledger().await.unwrap_or_else(|e| {
            warn!("Ignoring unreadable upload ledger {}: {}", self.metadata_path.display(), e);
            Vec::new()
        })
    }

    // Only a missing ledger counts as empty.
    async fn load_ledger(&self) -> Result<Vec<UploadRecord>, UploadError> {
        let raw = match tokio::fs::read_to_string(&self.metadata_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    async fn append_record(&self, record: &UploadRecord) -> Result<(), UploadError> {
        let _guard = self.ledger_lock.lock().await;

        let mut records = self.load_ledger().await?;
        records.push(record.clone());

        let json = serde_json::to_string_pretty(&records)?;
        let tmp = self.metadata_path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.metadata_path).await?;
        Ok(())
    }
}

fn normalize_topic(topic: Option<&str>) -> String {
    match topic.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => DEFAULT_TOPIC.to_string(),
    }
}

pub fn stored_name_for(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase);

    match ext {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}
