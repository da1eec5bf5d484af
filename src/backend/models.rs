use serde::{Deserialize, Serialize};

/// Backend upload endpoints a staged file can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadRoute {
    UploadCsv,
    UploadPdf,
    UpdateAttendeeList,
}

impl UploadRoute {
    pub fn path(&self) -> &'static str {
        match self {
            UploadRoute::UploadCsv => "upload-csv",
            UploadRoute::UploadPdf => "upload-pdf",
            UploadRoute::UpdateAttendeeList => "update-attendee-list",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VectorQueryRequest {
    pub filename: String,
    pub query: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VectorQueryResponse {
    #[serde(default)]
    pub chunks: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentSummary {
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub errors: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentResponse {
    pub summary: EnrichmentSummary,
    /// Path relative to the backend host, e.g. `/downloads/enriched.csv`.
    pub download_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpreadsheetPreview {
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub preview: Option<serde_json::Value>,
}

/// An entry from `list-files`. The backend has answered with both bare
/// filenames and objects over time, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackendFile {
    Name(String),
    Detailed {
        filename: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, rename = "uploadDate", skip_serializing_if = "Option::is_none")]
        upload_date: Option<String>,
    },
}

impl BackendFile {
    pub fn filename(&self) -> &str {
        match self {
            BackendFile::Name(name) => name,
            BackendFile::Detailed { filename, .. } => filename,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<BackendFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_list_accepts_both_shapes() {
        let parsed: FileListResponse = serde_json::from_str(
            r#"{"files": ["a.pdf", {"filename": "b.pdf", "title": "Board", "uploadDate": "2024-05-01"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.files.len(), 2);
        assert_eq!(parsed.files[0].filename(), "a.pdf");
        assert_eq!(parsed.files[1].filename(), "b.pdf");
    }

    #[test]
    fn missing_chunks_default_to_empty() {
        let parsed: VectorQueryResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.chunks.is_empty());
    }
}
