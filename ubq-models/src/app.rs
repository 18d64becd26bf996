//! Apps (tenants).

use serde::{Deserialize, Serialize};

use crate::content::ContentKind;

/// An app owns content items and app users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    /// Hyperlink to this app.
    pub url: String,
    /// Numeric id used by the v1 core API.
    pub id: u64,
    /// Token used in v2 paths.
    pub token: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub public_key: String,
    /// Hyperlink to the app's forms collection.
    pub forms: String,
    /// Hyperlink to the app's messages collection.
    pub messages: String,
    /// Hyperlink to the app's weblinks collection.
    pub weblinks: String,
    /// Hyperlink to the app's documents collection, when the server exposes one.
    #[serde(default)]
    pub documents: Option<String>,
}

impl App {
    /// Hyperlink to one of this app's content collections.
    pub fn collection_url(&self, kind: ContentKind) -> String {
        match kind {
            ContentKind::Forms => self.forms.clone(),
            ContentKind::Messages => self.messages.clone(),
            ContentKind::Weblinks => self.weblinks.clone(),
            ContentKind::Documents => self
                .documents
                .clone()
                .unwrap_or_else(|| format!("{}documents/", crate::refs::with_trailing_slash(&self.url))),
        }
    }
}

/// Body for creating an app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppData {
    pub name: String,
}
