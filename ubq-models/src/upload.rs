//! File uploads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settle::{Settlement, Settles};

/// Processing state of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Ticket issued, bytes not received yet.
    AwaitingUpload,
    Processing,
    #[serde(alias = "completed")]
    Complete,
    Failed,
    #[serde(other)]
    Unknown,
}

/// An upload ticket and its processing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upload {
    /// Hyperlink to this upload; ends with `/`.
    pub url: String,
    #[serde(default)]
    pub uuid: String,
    /// Pre-signed URL accepting a single binary PUT. Only present until the
    /// file has been received.
    #[serde(default)]
    pub upload_url: Option<String>,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    pub status: UploadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// Body for requesting an upload ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUpload {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Settles for Upload {
    fn settlement(&self) -> Settlement {
        match self.status {
            UploadStatus::Complete => Settlement::Ready,
            UploadStatus::Failed => Settlement::Failed,
            UploadStatus::AwaitingUpload | UploadStatus::Processing | UploadStatus::Unknown => {
                Settlement::Pending
            }
        }
    }
}
