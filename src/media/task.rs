//! Upload tasks — explicit, observable records for each pending asset.
//!
//! One task per asset, created at submission time. Status moves
//! pending → uploading → {succeeded, failed} and is never auto-retried,
//! so tests and callers can await completion deterministically.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::media::uploader::Uploader;

/// Where an upload task currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Succeeded,
    Failed,
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Uploading => "uploading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// One asset queued for upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadTask {
    pub local_ref: PathBuf,
    pub destination_folder: String,
    pub status: UploadStatus,
    pub result_url: Option<String>,
    pub error: Option<String>,
}

impl UploadTask {
    pub fn new(local_ref: impl Into<PathBuf>, destination_folder: impl Into<String>) -> Self {
        Self {
            local_ref: local_ref.into(),
            destination_folder: destination_folder.into(),
            status: UploadStatus::Pending,
            result_url: None,
            error: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == UploadStatus::Succeeded
    }

    /// Drive this task through the uploader to a terminal status.
    pub async fn run(mut self, uploader: &dyn Uploader) -> Self {
        self.status = UploadStatus::Uploading;
        match uploader
            .upload(&self.local_ref, &self.destination_folder)
            .await
        {
            Ok(receipt) => {
                self.status = UploadStatus::Succeeded;
                self.result_url = Some(receipt.secure_url);
            }
            Err(e) => {
                warn!(
                    file = %self.local_ref.display(),
                    error = %e,
                    "Upload task failed"
                );
                self.status = UploadStatus::Failed;
                self.error = Some(e.to_string());
            }
        }
        self
    }
}
