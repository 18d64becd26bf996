//! v1 app-user API: registration, profiles, devices and per-user configuration.
//!
//! Calls on behalf of a signed-in user send that user's JWT as a bearer
//! token, fetched from an [`IdentityProvider`] before each call. Generated
//! configuration lives in the bucket and is fetched without credentials.

use std::sync::Arc;

use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use ubq_core::config::{ServerConfig, UbiquityConfig};
use ubq_core::constants::SERVICE_NAME;
use ubq_core::credential::jwt_subject;
use ubq_core::error::{UbqError, UbqResult};

use crate::client::{ApiRequest, RequestExecutor};
use crate::identity::{IdentityProvider, StaticIdentity};
use crate::legacy::urls::{Endpoint, PathMapResolver, TemplateVars, UrlResolver};

/// Messages previously sent to the current user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageHistory {
    #[serde(default)]
    pub messages: Vec<Value>,
}

/// Client for one app of one company, acting for the signed-in user.
#[derive(Clone)]
pub struct AppUserClient {
    executor: RequestExecutor,
    company_token: String,
    app_token: String,
    identity: Arc<dyn IdentityProvider>,
    resolver: Arc<dyn UrlResolver>,
}

impl std::fmt::Debug for AppUserClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppUserClient")
            .field("company_token", &self.company_token)
            .field("app_token", &self.app_token)
            .field("executor", &self.executor)
            .finish()
    }
}

impl AppUserClient {
    pub fn new(
        company_token: impl Into<String>,
        app_token: impl Into<String>,
        server: &ServerConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> UbqResult<Self> {
        let executor = RequestExecutor::new(server, None)?;
        let resolver = Arc::new(PathMapResolver::new(
            executor.base_url(),
            executor.base_s3_url(),
        ));
        Ok(Self {
            executor,
            company_token: company_token.into(),
            app_token: app_token.into(),
            identity,
            resolver,
        })
    }

    /// Create a client from configuration. The user JWT, if any, is taken
    /// from `identity.jwt`.
    pub fn from_config(config: &UbiquityConfig) -> UbqResult<Self> {
        let (company_token, app_token) = config.require_app_tokens()?;
        let identity = match &config.identity.jwt {
            Some(jwt) => StaticIdentity::new(jwt.clone()),
            None => StaticIdentity::anonymous(),
        };
        Self::new(company_token, app_token, &config.server, Arc::new(identity))
    }

    /// Resolve endpoints through `resolver` instead of the configured origins.
    pub fn with_resolver(mut self, resolver: Arc<dyn UrlResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn company_token(&self) -> &str {
        &self.company_token
    }

    pub fn app_token(&self) -> &str {
        &self.app_token
    }

    /// Absolute URL of an endpoint, with tenant (and user) placeholders filled in.
    pub fn url(&self, endpoint: Endpoint, app_user_id: Option<&str>) -> UbqResult<String> {
        let template = self
            .resolver
            .resolve(SERVICE_NAME, endpoint)
            .ok_or_else(|| UbqError::InvalidUrl(format!("no url for endpoint {endpoint}")))?;
        let vars = TemplateVars {
            company_token: &self.company_token,
            app_token: &self.app_token,
            app_user_id,
        };
        Ok(vars.expand(&template))
    }

    /// The signed-in user's JWT, or an error when nobody is signed in.
    async fn require_jwt(&self) -> UbqResult<String> {
        self.identity
            .jwt()
            .await?
            .ok_or_else(|| UbqError::Auth("no signed-in app user".into()))
    }

    /// URL of a per-user bucket endpoint for the signed-in user.
    async fn user_url(&self, endpoint: Endpoint) -> UbqResult<String> {
        let sub = jwt_subject(&self.require_jwt().await?)?;
        self.url(endpoint, Some(&sub))
    }

    /// Register a new app user. No credentials are sent.
    pub async fn register(&self, username: &str, password: Option<&str>) -> UbqResult<Value> {
        let url = self.url(Endpoint::Registration, None)?;
        let form = json_data(&json!({ "username": username, "password": password }))?;
        let response = self
            .executor
            .execute::<Value>(ApiRequest::post(url).multipart(form).anonymous())
            .await
            .map_err(|e| describe(e, "unable to register user"))?;
        info!(username, "registered app user");
        Ok(response.unwrap_or_default())
    }

    /// The signed-in user's profile data.
    pub async fn get_profile(&self) -> UbqResult<Value> {
        let url = self.url(Endpoint::GetProfile, None)?;
        let jwt = self.require_jwt().await?;
        let mut response: Value = self
            .executor
            .execute_json(ApiRequest::get(url).bearer(jwt))
            .await
            .map_err(|e| describe(e, "unable to get profile for user"))?;
        Ok(response.get_mut("data").map(Value::take).unwrap_or_default())
    }

    /// Store profile fields. With `clear_existing`, fields not in `profile`
    /// are removed server-side.
    pub async fn set_profile(&self, profile: &Map<String, Value>, clear_existing: bool) -> UbqResult<()> {
        let url = self.url(Endpoint::SetProfile, None)?;
        let mut body = profile.clone();
        if clear_existing {
            body.insert("_clear_profile".to_string(), Value::Bool(true));
        }
        let form = json_data(&body)?;
        let jwt = self.require_jwt().await?;
        self.executor
            .execute_unit(ApiRequest::post(url).multipart(form).bearer(jwt))
            .await
            .map_err(|e| describe(e, "unable to update profile data"))
    }

    /// Register a push-notification installation for the signed-in user.
    pub async fn set_device(&self, installation_id: &str) -> UbqResult<()> {
        let url = self.url(Endpoint::SetDevice, None)?;
        let form = Form::new()
            .text("action", "add")
            .text("installation_id", installation_id.to_string());
        let jwt = self.require_jwt().await?;
        self.executor
            .execute_unit(ApiRequest::post(url).multipart(form).bearer(jwt))
            .await
            .map_err(|e| describe(e, "unable to update device"))
    }

    /// Public app configuration; needs no user.
    pub async fn app_public_configuration(&self) -> UbqResult<Value> {
        let url = self.url(Endpoint::AppPublicConfig, None)?;
        self.executor
            .execute_json(ApiRequest::get(url).anonymous())
            .await
            .map_err(|e| describe(e, "unable to retrieve app public config"))
    }

    /// Configuration generated for the signed-in user.
    pub async fn app_configuration(&self) -> UbqResult<Value> {
        let url = self.user_url(Endpoint::AppConfig).await?;
        self.executor
            .execute_json(ApiRequest::get(url).anonymous())
            .await
            .map_err(|e| describe(e, "unable to retrieve app config for the current user"))
    }

    /// Content visible to the current user, or the public content when
    /// nobody is signed in.
    ///
    /// With `use_old_style_document_map`, a `documents` list is returned as
    /// `iaps.{ios,android,web}` for consumers of the older layout.
    pub async fn app_content(&self, use_old_style_document_map: bool) -> UbqResult<Value> {
        let Some(jwt) = self.identity.jwt().await? else {
            debug!("no signed-in user, serving public app content");
            return self.public_app_content().await;
        };
        let url = self.url(Endpoint::ViewableIssues, Some(&jwt_subject(&jwt)?))?;
        let data: Value = self
            .executor
            .execute_json(ApiRequest::get(url).anonymous())
            .await
            .map_err(|e| describe(e, "unable to retrieve the viewable issues for the current user"))?;

        if !use_old_style_document_map {
            return Ok(data);
        }
        match data.get("documents") {
            Some(documents) => Ok(json!({
                "categories": data.get("categories").cloned().unwrap_or(Value::Null),
                "iaps": {
                    "ios": documents,
                    "android": documents,
                    "web": documents,
                },
            })),
            None => Ok(data.clone()),
        }
    }

    /// Messages sent to the signed-in user. A 403 means the user has no
    /// history yet and yields an empty list.
    pub async fn message_history(&self) -> UbqResult<MessageHistory> {
        let url = self.user_url(Endpoint::MessageHistory).await?;
        match self
            .executor
            .execute_json(ApiRequest::get(url).anonymous())
            .await
        {
            Ok(history) => Ok(history),
            Err(e) if e.status() == Some(403) => {
                debug!("message history forbidden, treating as empty");
                Ok(MessageHistory::default())
            }
            Err(e) => Err(describe(e, "unable to retrieve the message history for the current user")),
        }
    }

    async fn public_app_content(&self) -> UbqResult<Value> {
        let config = self.app_public_configuration().await?;
        Ok(json!({
            "categories": config.get("categories").cloned().unwrap_or(Value::Null),
            "documents": config.pointer("/iaps/ios").cloned().unwrap_or(Value::Null),
        }))
    }
}

/// Multipart form carrying `body` as the `json_data` field.
fn json_data<B: Serialize + ?Sized>(body: &B) -> UbqResult<Form> {
    Ok(Form::new().text("json_data", serde_json::to_string(body)?))
}

/// Replace the generic message of an API error with one naming the operation.
fn describe(error: UbqError, message: &str) -> UbqError {
    match error {
        UbqError::Api { response, .. } => UbqError::api(message, response),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ubq_core::error::ApiResponse;

    fn client(identity: StaticIdentity) -> AppUserClient {
        let server = ServerConfig {
            base_url: "https://cloud.example.com/".into(),
            base_s3_url: "https://bucket.example.com/prod/".into(),
            ..ServerConfig::default()
        };
        AppUserClient::new("co", "app", &server, Arc::new(identity)).unwrap()
    }

    #[test]
    fn test_url_expansion() {
        let c = client(StaticIdentity::anonymous());
        assert_eq!(
            c.url(Endpoint::SetDevice, None).unwrap(),
            "https://cloud.example.com/api/appusers/v1/app/set_device/"
        );
        assert_eq!(
            c.url(Endpoint::AppPublicConfig, None).unwrap(),
            "https://bucket.example.com/prod/c/co/apps/app/app.json"
        );
    }

    struct NoUrls;

    impl UrlResolver for NoUrls {
        fn resolve(&self, _service: &str, _endpoint: Endpoint) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_unknown_endpoint_is_invalid_url() {
        let c = client(StaticIdentity::anonymous()).with_resolver(Arc::new(NoUrls));
        assert!(matches!(
            c.url(Endpoint::GetProfile, None),
            Err(UbqError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_user_calls_need_a_user() {
        let c = client(StaticIdentity::anonymous());
        assert!(matches!(c.app_configuration().await, Err(UbqError::Auth(_))));
    }

    #[test]
    fn test_describe_keeps_response() {
        let err = UbqError::api(
            "not authorized",
            ApiResponse {
                status: 401,
                url: "u".into(),
                body: String::new(),
            },
        );
        let err = describe(err, "unable to update device");
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("unable to update device"));
    }
}
