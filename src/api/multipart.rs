use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("File exceeds the {limit} byte limit")]
    TooLarge { limit: usize },
    #[error("Malformed form data: {0}")]
    Malformed(String),
}

#[derive(Debug)]
pub struct FormFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// A parsed multipart form: the first `file` part plus plain text fields.
#[derive(Debug, Default)]
pub struct FormData {
    pub file: Option<FormFile>,
    pub fields: HashMap<String, String>,
}

impl FormData {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Reads the whole form, rejecting any single part larger than `max_bytes`.
pub async fn read_form(mut payload: Multipart, max_bytes: usize) -> Result<FormData, FormError> {
    let mut form = FormData::default();

    while let Some(mut field) = payload.try_next().await.map_err(|e| FormError::Malformed(e.to_string()))? {
        let disposition = field.content_disposition().cloned();
        let name = disposition
            .as_ref()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let filename = disposition
            .as_ref()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|e| FormError::Malformed(e.to_string()))? {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(FormError::TooLarge { limit: max_bytes });
            }
            bytes.extend_from_slice(&chunk);
        }

        if name == "file" {
            if form.file.is_none() {
                form.file = Some(FormFile {
                    name: filename.unwrap_or_else(|| "upload".to_string()),
                    bytes,
                });
            }
        } else if !name.is_empty() {
            form.fields.insert(name, String::from_utf8_lossy(&bytes).into_owned());
        }
    }

    Ok(form)
}
