//! URL resolution for the v1 app-user surface.
//!
//! Endpoints are templates with `{{companyToken}}`, `{{appToken}}` and
//! `{{appUserId}}` placeholders. By default they are expanded against the
//! configured API and bucket origins; a [`UrlResolver`] may supply them
//! instead (for example a service locator that knows per-region hosts).

use std::fmt;

use ubq_core::constants::paths;

/// Named endpoints of the v1 app-user surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AppPublicConfig,
    Registration,
    GetProfile,
    SetProfile,
    SetDevice,
    AppConfig,
    MessageHistory,
    ViewableIssues,
}

impl Endpoint {
    /// Name under which service locators know this endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::AppPublicConfig => "appPublicConfig",
            Endpoint::Registration => "registration",
            Endpoint::GetProfile => "getProfile",
            Endpoint::SetProfile => "setProfile",
            Endpoint::SetDevice => "setDevice",
            Endpoint::AppConfig => "appConfig",
            Endpoint::MessageHistory => "messageHistory",
            Endpoint::ViewableIssues => "viewableIssues",
        }
    }

    /// Path template relative to the endpoint's origin.
    pub fn template(&self) -> String {
        match self {
            Endpoint::AppPublicConfig => "c/{{companyToken}}/apps/{{appToken}}/app.json".to_string(),
            Endpoint::Registration => format!("{}{{{{appToken}}}}/register/", paths::APP_USERS_V1),
            Endpoint::GetProfile => format!("{}{{{{appToken}}}}/profile/", paths::APP_USERS_V1),
            Endpoint::SetProfile => format!("{}{{{{appToken}}}}/profile/set/", paths::APP_USERS_V1),
            Endpoint::SetDevice => format!("{}{{{{appToken}}}}/set_device/", paths::APP_USERS_V1),
            Endpoint::AppConfig | Endpoint::ViewableIssues => {
                "c/{{companyToken}}/apps/{{appToken}}/app_users/{{appUserId}}/app_config.json"
                    .to_string()
            }
            Endpoint::MessageHistory => {
                "c/{{companyToken}}/apps/{{appToken}}/app_users/{{appUserId}}/messaging/list.json"
                    .to_string()
            }
        }
    }

    /// Whether the endpoint is served from the config bucket rather than the API.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            Endpoint::AppPublicConfig
                | Endpoint::AppConfig
                | Endpoint::MessageHistory
                | Endpoint::ViewableIssues
        )
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Supplies the URL template for a named endpoint of a service.
///
/// Returning `None` means the resolver does not know the endpoint.
pub trait UrlResolver: Send + Sync {
    fn resolve(&self, service: &str, endpoint: Endpoint) -> Option<String>;
}

/// Expands endpoint templates against fixed API and bucket origins.
#[derive(Debug, Clone)]
pub struct PathMapResolver {
    base_url: String,
    base_s3_url: String,
}

impl PathMapResolver {
    /// Both origins must end with `/`.
    pub fn new(base_url: impl Into<String>, base_s3_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            base_s3_url: base_s3_url.into(),
        }
    }
}

impl UrlResolver for PathMapResolver {
    fn resolve(&self, _service: &str, endpoint: Endpoint) -> Option<String> {
        let origin = if endpoint.is_static() {
            &self.base_s3_url
        } else {
            &self.base_url
        };
        Some(format!("{origin}{}", endpoint.template()))
    }
}

/// Values substituted into endpoint templates.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub company_token: &'a str,
    pub app_token: &'a str,
    pub app_user_id: Option<&'a str>,
}

impl TemplateVars<'_> {
    pub fn expand(&self, template: &str) -> String {
        let url = template
            .replace("{{companyToken}}", self.company_token)
            .replace("{{appToken}}", self.app_token);
        match self.app_user_id {
            Some(id) => url.replace("{{appUserId}}", id),
            None => url,
        }
    }
}
