//! Content items and their versions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The content collections an app exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Forms,
    Messages,
    Weblinks,
    Documents,
}

impl ContentKind {
    /// Path segment for this collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Forms => "forms",
            ContentKind::Messages => "messages",
            ContentKind::Weblinks => "weblinks",
            ContentKind::Documents => "documents",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of page a weblink points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeblinkType {
    Website,
    WebForm,
}

/// A form, message, weblink or document owned by an app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Hyperlink to this item; ends with `/`.
    pub url: String,
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Hyperlink to the item's versions.
    #[serde(default)]
    pub versions: String,
    /// Hyperlink to the item's publishing records.
    #[serde(default)]
    pub publishing_records: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_available: bool,
    /// Only present on weblinks.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub weblink_type: Option<WeblinkType>,
}

/// Body for creating or editing a content item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItemData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Only meaningful for weblinks.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub weblink_type: Option<WeblinkType>,
}

impl ContentItemData {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A numbered snapshot of a content item's payload.
///
/// `P` carries the kind-specific fields; it is flattened into the version
/// object on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItemVersion<P = Map<String, Value>> {
    /// Hyperlink to this version.
    pub url: String,
    #[serde(default)]
    pub name: String,
    /// Sequence number, increasing per item.
    pub number: u32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// False until the server finishes processing the version.
    #[serde(default)]
    pub is_ready: bool,
    #[serde(flatten)]
    pub payload: P,
}

/// Links a version payload type to the collection it belongs to.
pub trait VersionPayload: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: ContentKind;
}

/// Form definition: a JSON schema plus its UI hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormPayload {
    #[serde(default)]
    pub schema: Value,
    #[serde(default)]
    pub ui_schema: Value,
}

impl VersionPayload for FormPayload {
    const KIND: ContentKind = ContentKind::Forms;
}

/// Push/in-app message content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl VersionPayload for MessagePayload {
    const KIND: ContentKind = ContentKind::Messages;
}

/// Link to an external page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeblinkPayload {
    pub content_url: String,
    #[serde(rename = "type")]
    pub weblink_type: WeblinkType,
}

impl VersionPayload for WeblinkPayload {
    const KIND: ContentKind = ContentKind::Weblinks;
}

/// Document built from an uploaded source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    /// Hyperlink to the upload the version was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_upload: Option<String>,
    /// Hyperlink to the rendered pages, once processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
}

impl VersionPayload for DocumentPayload {
    const KIND: ContentKind = ContentKind::Documents;
}

pub type FormVersion = ContentItemVersion<FormPayload>;
pub type MessageVersion = ContentItemVersion<MessagePayload>;
pub type WeblinkVersion = ContentItemVersion<WeblinkPayload>;
pub type DocumentVersion = ContentItemVersion<DocumentPayload>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weblink_item() {
        let json = r#"{
            "url": "https://cloud.example.com/api/v2/apps/abc/weblinks/u-1/",
            "uuid": "u-1",
            "name": "Clinic site",
            "slug": "clinic",
            "description": "",
            "versions": "https://cloud.example.com/api/v2/apps/abc/weblinks/u-1/versions/",
            "publishing_records": "https://cloud.example.com/api/v2/apps/abc/weblinks/u-1/publishing_records/",
            "created": "2024-03-01T10:00:00Z",
            "modified": "2024-03-02T10:00:00+10:00",
            "is_available": true,
            "type": "web_form"
        }"#;
        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.weblink_type, Some(WeblinkType::WebForm));
        assert!(item.is_available);
        assert!(item.modified.unwrap() > item.created.unwrap());
    }

    #[test]
    fn test_parse_form_version_flattens_payload() {
        let json = r#"{
            "url": "https://cloud.example.com/api/v2/apps/abc/forms/u-1/versions/3/",
            "name": "v3",
            "number": 3,
            "metadata": {"author": "sam"},
            "schema": {"type": "object"},
            "ui_schema": {}
        }"#;
        let version: FormVersion = serde_json::from_str(json).unwrap();
        assert_eq!(version.number, 3);
        assert!(!version.is_ready);
        assert_eq!(version.payload.schema["type"], "object");
        assert_eq!(version.metadata["author"], "sam");
    }

    #[test]
    fn test_untyped_version_keeps_extra_fields() {
        let json = r#"{"url":"u","number":1,"is_ready":true,"title":"Hi"}"#;
        let version: ContentItemVersion = serde_json::from_str(json).unwrap();
        assert!(version.is_ready);
        assert_eq!(version.payload["title"], "Hi");
    }

    #[test]
    fn test_item_data_skips_unset_fields() {
        let data = ContentItemData::named("Intake").slug("intake");
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Intake", "slug": "intake"}));
    }

    #[test]
    fn test_kind_segments() {
        assert_eq!(FormPayload::KIND.as_str(), "forms");
        assert_eq!(DocumentPayload::KIND.to_string(), "documents");
    }
}
