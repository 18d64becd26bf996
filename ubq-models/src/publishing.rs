//! Publishing records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settle::{Settlement, Settles};

/// Rollout state of a publishing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    Pending,
    InProgress,
    #[serde(alias = "complete", alias = "completed")]
    Published,
    Failed,
    /// A status this client does not know yet; treated as still running.
    #[serde(other)]
    Unknown,
}

/// Associates a version with an availability channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishingRecord {
    /// Hyperlink to this record.
    pub url: String,
    #[serde(default)]
    pub available: bool,
    /// Hyperlink to the published version.
    pub version: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: String,
    /// Absent on records created before asynchronous publishing existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PublishStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body for publishing a version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPublishingRecord {
    /// Hyperlink to the version to publish.
    pub version: String,
    pub available: bool,
}

impl Settles for PublishingRecord {
    fn settlement(&self) -> Settlement {
        match self.status {
            None | Some(PublishStatus::Published) => Settlement::Ready,
            Some(PublishStatus::Failed) => Settlement::Failed,
            Some(PublishStatus::Pending | PublishStatus::InProgress | PublishStatus::Unknown) => {
                Settlement::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str) -> PublishingRecord {
        let json = format!(
            r#"{{"url":"r","available":true,"version":"v","created_by":"ops","status":"{status}"}}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_status_settlement() {
        assert_eq!(record("in_progress").settlement(), Settlement::Pending);
        assert_eq!(record("published").settlement(), Settlement::Ready);
        assert_eq!(record("completed").settlement(), Settlement::Ready);
        assert_eq!(record("failed").settlement(), Settlement::Failed);
        assert_eq!(record("rolling_back").settlement(), Settlement::Pending);
    }

    #[test]
    fn test_legacy_record_without_status_is_settled() {
        let json = r#"{"url":"r","available":false,"version":"v"}"#;
        let record: PublishingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.settlement(), Settlement::Ready);
    }
}
