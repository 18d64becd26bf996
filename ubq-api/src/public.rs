//! Read-only client for published content.
//!
//! App frontends use this surface to fetch the live version of a form,
//! message or weblink through the `content-lookup` endpoints.

use ubq_core::config::{ServerConfig, UbiquityConfig};
use ubq_core::constants::paths;
use ubq_core::error::UbqResult;
use ubq_core::Credential;
use ubq_models::{
    ApiList, App, ContentLookup, FormPayload, MessagePayload, VersionPayload, WeblinkPayload,
};

use crate::client::RequestExecutor;

#[derive(Debug, Clone)]
pub struct PublicClient {
    executor: RequestExecutor,
}

impl PublicClient {
    /// Create a client; anonymous unless a credential is given.
    pub fn new(credential: Option<Credential>, server: &ServerConfig) -> UbqResult<Self> {
        Ok(Self {
            executor: RequestExecutor::new(server, credential)?,
        })
    }

    /// Create a client from configuration; the credential is optional here.
    pub fn from_config(config: &UbiquityConfig) -> UbqResult<Self> {
        Ok(Self {
            executor: RequestExecutor::from_config(config)?,
        })
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// List apps (first page).
    pub async fn list_apps(&self) -> UbqResult<ApiList<App>> {
        let url = self.executor.url(&format!("{}apps/", paths::V2));
        self.executor.get_json(&url).await
    }

    /// Get one app by token.
    pub async fn get_app(&self, token: &str) -> UbqResult<App> {
        let url = self.executor.url(&format!("{}apps/{token}/", paths::V2));
        self.executor.get_json(&url).await
    }

    /// Look up published content of kind `P`.
    ///
    /// Without `version` the server answers with the currently published
    /// version.
    pub async fn lookup<P: VersionPayload>(
        &self,
        token: &str,
        id: &str,
        version: Option<u32>,
    ) -> UbqResult<ContentLookup<P>> {
        let url = self.lookup_url(token, P::KIND.as_str(), id, version)?;
        self.executor.get_json(&url).await
    }

    /// Published form definition.
    pub async fn get_form(
        &self,
        token: &str,
        id: &str,
        version: Option<u32>,
    ) -> UbqResult<ContentLookup<FormPayload>> {
        self.lookup(token, id, version).await
    }

    /// Published message.
    pub async fn get_message(
        &self,
        token: &str,
        id: &str,
        version: Option<u32>,
    ) -> UbqResult<ContentLookup<MessagePayload>> {
        self.lookup(token, id, version).await
    }

    /// Published weblink.
    pub async fn get_weblink(
        &self,
        token: &str,
        id: &str,
        version: Option<u32>,
    ) -> UbqResult<ContentLookup<WeblinkPayload>> {
        self.lookup(token, id, version).await
    }

    fn lookup_url(
        &self,
        token: &str,
        kind: &str,
        id: &str,
        version: Option<u32>,
    ) -> UbqResult<String> {
        let url = self
            .executor
            .url(&format!("{}apps/{token}/content-lookup/{kind}/{id}/", paths::V2));
        let query: Vec<(&str, String)> = version
            .map(|n| vec![("version", n.to_string())])
            .unwrap_or_default();
        RequestExecutor::with_query(&url, &query)
    }
}
