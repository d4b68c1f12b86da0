//! Uploader — multipart submit to the media hosting endpoint.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::config::MediaConfig;
use crate::error::UploadError;
use crate::media::probe::ConnectivityProbe;

/// What a successful upload hands back.
///
/// Downstream logic only depends on `secure_url`; everything else the
/// host returned passes through opaquely in `raw`.
#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub secure_url: String,
    pub raw: serde_json::Value,
}

/// Uploads a local file to the hosting endpoint.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(
        &self,
        local_ref: &Path,
        destination_folder: &str,
    ) -> Result<UploadReceipt, UploadError>;
}

/// Production uploader.
///
/// Preflights connectivity, then submits one bounded multipart request.
/// No automatic retry — the caller owns rollback of any optimistic state.
pub struct MediaUploader {
    client: reqwest::Client,
    config: MediaConfig,
    probe: Arc<dyn ConnectivityProbe>,
}

impl MediaUploader {
    pub fn new(config: MediaConfig, probe: Arc<dyn ConnectivityProbe>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            probe,
        }
    }
}

#[async_trait]
impl Uploader for MediaUploader {
    async fn upload(
        &self,
        local_ref: &Path,
        destination_folder: &str,
    ) -> Result<UploadReceipt, UploadError> {
        // Preflight: no network, no request.
        if !self.probe.is_reachable().await {
            return Err(UploadError::NoConnectivity);
        }

        let file_bytes = tokio::fs::read(local_ref)
            .await
            .map_err(|e| UploadError::Failed(format!("unreadable local file: {e}")))?;

        let file_name = local_ref
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();

        let content_type = content_type_for(local_ref);
        let part = Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(|e| UploadError::Failed(format!("invalid content type: {e}")))?;

        let form = Form::new()
            .text("upload_preset", self.config.upload_preset.clone())
            .text("folder", destination_folder.to_string())
            .part("file", part);

        let response = self
            .client
            .post(&self.config.upload_url)
            .multipart(form)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                message: rejection_message(&body),
            });
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| UploadError::Failed(format!("malformed response body: {e}")))?;

        let secure_url = raw
            .get("secure_url")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| UploadError::Failed("response missing secure_url".to_string()))?
            .to_string();

        info!(url = %secure_url, folder = destination_folder, "Media upload complete");
        Ok(UploadReceipt { secure_url, raw })
    }
}

/// Classify a reqwest send failure.
fn classify_send_error(e: reqwest::Error) -> UploadError {
    if e.is_timeout() {
        UploadError::Timeout
    } else if e.is_builder() {
        UploadError::Failed(e.to_string())
    } else {
        UploadError::NoConnectivity
    }
}

/// Pull a human-readable message out of a host rejection body.
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(serde_json::Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Infer a content type from the file extension, generic when unknown.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
