//! v1 core admin API.
//!
//! Responses are returned as raw JSON; the v1 shapes predate the typed v2
//! models and vary between deployments.

use serde_json::Value;

use ubq_core::config::{ServerConfig, UbiquityConfig};
use ubq_core::constants::paths;
use ubq_core::error::{UbqError, UbqResult};
use ubq_core::Credential;
use ubq_models::Identifier;

use crate::client::RequestExecutor;

#[derive(Debug, Clone)]
pub struct LegacyAdminClient {
    executor: RequestExecutor,
}

impl LegacyAdminClient {
    pub fn new(credential: Credential, server: &ServerConfig) -> UbqResult<Self> {
        Ok(Self {
            executor: RequestExecutor::new(server, Some(credential))?,
        })
    }

    pub fn from_config(config: &UbiquityConfig) -> UbqResult<Self> {
        Self::new(config.require_credential()?, &config.server)
    }

    /// GET a v1 path, or an absolute link returned by an earlier response.
    async fn request(&self, path: &str) -> UbqResult<Value> {
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            self.executor.url(path)
        };
        self.executor.get_json(&url).await
    }

    pub async fn apps(&self) -> UbqResult<Value> {
        self.request(&format!("{}apps/", paths::CORE_V1)).await
    }

    pub async fn app_details(&self, app: impl Into<Identifier>) -> UbqResult<Value> {
        let app = app.into();
        self.request(&format!("{}apps/{app}/", paths::CORE_V1)).await
    }

    pub async fn documents(&self, app: impl Into<Identifier>) -> UbqResult<Value> {
        let app = app.into();
        self.request(&format!("{}apps/{app}/documents/", paths::CORE_V1))
            .await
    }

    pub async fn document_versions(
        &self,
        app: impl Into<Identifier>,
        document: impl Into<Identifier>,
    ) -> UbqResult<Value> {
        let (app, document) = (app.into(), document.into());
        self.request(&format!(
            "{}apps/{app}/documents/{document}/versions/",
            paths::CORE_V1
        ))
        .await
    }

    /// Pages of a document version, following its `links.pages` hyperlink.
    pub async fn pages(&self, document_version: &Value) -> UbqResult<Value> {
        let link = document_version
            .pointer("/links/pages")
            .and_then(Value::as_str)
            .ok_or_else(|| UbqError::InvalidUrl("document version has no links.pages".to_string()))?;
        self.request(link).await
    }
}
