//! Administrative client for the v2 API.
//!
//! Entry point for managing apps and their content. Content collections are
//! reached through [`AdminClient::forms`], [`AdminClient::messages`],
//! [`AdminClient::weblinks`] and [`AdminClient::documents`].

use ubq_core::config::{PollingConfig, ServerConfig, UbiquityConfig};
use ubq_core::error::UbqResult;
use ubq_core::Credential;
use ubq_models::{AppRef, DocumentPayload, FormPayload, MessagePayload, VersionPayload, WeblinkPayload};

use crate::client::RequestExecutor;
use crate::endpoints::content::ContentItemApi;
use crate::endpoints::uploads::UploadApi;
use crate::waiter::{WaitPolicy, Waiter};

/// Client for the authenticated v2 admin surface.
#[derive(Debug, Clone)]
pub struct AdminClient {
    executor: RequestExecutor,
    polling: PollingConfig,
}

impl AdminClient {
    /// Create a client for one deployment with one credential.
    pub fn new(credential: Credential, server: &ServerConfig) -> UbqResult<Self> {
        Ok(Self {
            executor: RequestExecutor::new(server, Some(credential))?,
            polling: PollingConfig::default(),
        })
    }

    /// Create a client from a full configuration. A credential is required.
    pub fn from_config(config: &UbiquityConfig) -> UbqResult<Self> {
        let credential = config.require_credential()?;
        Ok(Self {
            executor: RequestExecutor::new(&config.server, Some(credential))?,
            polling: config.polling.clone(),
        })
    }

    /// Override the polling bounds used by the built-in waiters.
    pub fn with_polling(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }

    /// The executor shared by every endpoint of this client.
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Waiter for quick transitions (document and version creation).
    pub fn fast_waiter(&self) -> Waiter {
        Waiter::new(WaitPolicy::fast(&self.polling))
    }

    /// Waiter for slow transitions (uploads and publishing).
    pub fn slow_waiter(&self) -> Waiter {
        Waiter::new(WaitPolicy::slow(&self.polling))
    }

    /// Content API for any collection, selected by payload type.
    pub fn content<'a, P: VersionPayload>(&self, app: impl Into<AppRef<'a>>) -> ContentItemApi<P> {
        ContentItemApi::new(self.executor.clone(), app.into())
    }

    /// Form definitions of an app.
    pub fn forms<'a>(&self, app: impl Into<AppRef<'a>>) -> ContentItemApi<FormPayload> {
        self.content(app)
    }

    /// Messages of an app.
    pub fn messages<'a>(&self, app: impl Into<AppRef<'a>>) -> ContentItemApi<MessagePayload> {
        self.content(app)
    }

    /// Weblinks of an app.
    pub fn weblinks<'a>(&self, app: impl Into<AppRef<'a>>) -> ContentItemApi<WeblinkPayload> {
        self.content(app)
    }

    /// Documents of an app.
    pub fn documents<'a>(&self, app: impl Into<AppRef<'a>>) -> ContentItemApi<DocumentPayload> {
        self.content(app)
    }

    /// Two-phase file uploads into an app.
    pub fn uploads<'a>(&self, app: impl Into<AppRef<'a>>) -> UploadApi {
        UploadApi::new(self.executor.clone(), app.into())
    }
}
