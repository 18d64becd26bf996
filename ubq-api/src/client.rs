//! Request executor for the Ubiquity REST API.
//!
//! Handles authorization, custom headers, timeouts and the mapping of HTTP
//! outcomes onto `UbqError`. Nothing here retries: only the waiter repeats
//! requests, and only where a call site asks for it.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use ubq_core::config::{normalize_base_url, ServerConfig, UbiquityConfig};
use ubq_core::constants;
use ubq_core::error::{ApiResponse, UbqError, UbqResult};
use ubq_core::Credential;

/// Body of an outgoing request.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// JSON body (v2 surface).
    Json(serde_json::Value),
    /// Multipart form (v1 surface).
    Multipart(reqwest::multipart::Form),
    /// Raw bytes with an explicit content type (signed uploads).
    Bytes {
        data: Vec<u8>,
        content_type: String,
    },
}

/// Which credential, if any, a request carries.
#[derive(Debug, Clone, Default)]
pub enum Auth {
    /// The executor's own credential.
    #[default]
    Client,
    /// No `Authorization` header at all.
    Anonymous,
    /// A credential supplied for this request only.
    Override(Credential),
}

/// A single request, described before it is sent.
#[derive(Debug)]
pub struct ApiRequest {
    method: Method,
    url: String,
    body: RequestBody,
    auth: Auth,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: RequestBody::Empty,
            auth: Auth::Client,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> UbqResult<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach a multipart form body.
    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Attach a raw binary body.
    pub fn bytes(mut self, data: Vec<u8>, content_type: impl Into<String>) -> Self {
        self.body = RequestBody::Bytes {
            data,
            content_type: content_type.into(),
        };
        self
    }

    /// Send without any credential.
    pub fn anonymous(mut self) -> Self {
        self.auth = Auth::Anonymous;
        self
    }

    /// Send with a bearer token instead of the executor's credential.
    pub fn bearer(mut self, jwt: impl Into<String>) -> Self {
        self.auth = Auth::Override(Credential::BearerToken(jwt.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Issues authorized requests against one Ubiquity deployment.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct RequestExecutor {
    inner: Client,
    /// API origin, always ending with `/`.
    base_url: String,
    /// Config bucket origin, always ending with `/`.
    base_s3_url: String,
    credential: Option<Credential>,
    timeout: Duration,
    /// Headers added to requests aimed at `base_url`.
    custom_headers: Vec<(String, String)>,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("base_s3_url", &self.base_s3_url)
            .field("credential", &self.credential)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RequestExecutor {
    /// Create an executor from server settings and an optional credential.
    pub fn new(config: &ServerConfig, credential: Option<Credential>) -> UbqResult<Self> {
        let inner = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(constants::user_agent())
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| UbqError::Config(format!("failed to build HTTP client: {e}")))?;

        let base_url = non_empty_base(&config.base_url, constants::DEFAULT_BASE_URL);
        let base_s3_url = non_empty_base(&config.base_s3_url, constants::DEFAULT_BASE_S3_URL);

        let custom_headers = config
            .custom_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Self {
            inner,
            base_url,
            base_s3_url,
            credential,
            timeout: config.timeout(),
            custom_headers,
        })
    }

    /// Create an executor using the server section and credential of a full config.
    pub fn from_config(config: &UbiquityConfig) -> UbqResult<Self> {
        Self::new(&config.server, config.identity.credential())
    }

    /// The same executor with a different credential.
    pub fn with_credential(&self, credential: Option<Credential>) -> Self {
        Self {
            credential,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn base_s3_url(&self) -> &str {
        &self.base_s3_url
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Value of the `Authorization` header sent by default, if any.
    pub fn authorization(&self) -> Option<String> {
        self.credential.as_ref().map(Credential::authorization)
    }

    /// Absolute URL for an API path. Leading slashes on `path` are ignored.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, clean_path(path))
    }

    /// Absolute URL in the config bucket.
    pub fn s3_url(&self, path: &str) -> String {
        format!("{}{}", self.base_s3_url, clean_path(path))
    }

    /// Append query parameters to an absolute URL.
    pub fn with_query(url: &str, query: &[(&str, String)]) -> UbqResult<String> {
        if query.is_empty() {
            return Ok(url.to_string());
        }
        let mut parsed = url::Url::parse(url)?;
        {
            let mut pairs = parsed.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(parsed.into())
    }

    /// Build the reqwest request for an [`ApiRequest`].
    fn build_request(&self, request: ApiRequest) -> RequestBuilder {
        let ApiRequest {
            method,
            url,
            body,
            auth,
        } = request;

        let targets_api = url.starts_with(&self.base_url);
        let mut builder = self.inner.request(method, &url);

        let credential = match auth {
            Auth::Client => self.credential.clone(),
            Auth::Anonymous => None,
            Auth::Override(c) => Some(c),
        };
        if let Some(c) = credential {
            builder = builder.header(AUTHORIZATION, c.authorization());
        }

        if targets_api {
            for (key, value) in &self.custom_headers {
                builder = builder.header(key.as_str(), value.as_str());
            }
        }

        match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form),
            RequestBody::Bytes { data, content_type } => {
                builder.header(CONTENT_TYPE, content_type).body(data)
            }
        }
    }

    /// Send a request and check its status. The body is left unread.
    pub async fn send(&self, request: ApiRequest) -> UbqResult<Response> {
        let request_id = Uuid::new_v4();
        let method = request.method.clone();
        let url = request.url.clone();
        debug!(%request_id, %method, %url, "sending request");

        let response = self
            .build_request(request)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        debug!(%request_id, %method, %url, %status, "received response");
        Self::check_status(&method, response).await
    }

    /// Send a request and decode its JSON body.
    ///
    /// Returns `Ok(None)` for 204 No Content or an empty body; no decoding
    /// is attempted in that case.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> UbqResult<Option<T>> {
        let response = self.send(request).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let url = response.url().to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UbqError::Network(format!("failed to read response body: {e}")))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| UbqError::Serialization(format!("failed to parse response from {url}: {e}")))
    }

    /// Send a request whose response must carry a JSON body.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: ApiRequest) -> UbqResult<T> {
        let url = request.url.clone();
        self.execute(request)
            .await?
            .ok_or_else(|| UbqError::Serialization(format!("empty response body from {url}")))
    }

    /// Send a request and discard any response body.
    pub async fn execute_unit(&self, request: ApiRequest) -> UbqResult<()> {
        self.send(request).await?;
        Ok(())
    }

    // --- Convenience wrappers ---

    /// GET + decode.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> UbqResult<T> {
        self.execute_json(ApiRequest::get(url)).await
    }

    /// POST a JSON body + decode.
    pub async fn post_json<T, B>(&self, url: &str, body: &B) -> UbqResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute_json(ApiRequest::post(url).json(body)?).await
    }

    /// PUT a JSON body + decode.
    pub async fn put_json<T, B>(&self, url: &str, body: &B) -> UbqResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute_json(ApiRequest::put(url).json(body)?).await
    }

    /// POST without a body, ignoring the response content.
    pub async fn post_empty(&self, url: &str) -> UbqResult<()> {
        self.execute_unit(ApiRequest::post(url)).await
    }

    /// DELETE, ignoring the response content.
    pub async fn delete(&self, url: &str) -> UbqResult<()> {
        self.execute_unit(ApiRequest::delete(url)).await
    }

    /// Map a non-success status to `UbqError::Api`, keeping the body for inspection.
    async fn check_status(method: &Method, response: Response) -> UbqResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        warn!(%method, %url, status = status.as_u16(), "request rejected");

        let message = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "not authorized".to_string(),
            StatusCode::NOT_FOUND => "resource not found".to_string(),
            s if s.is_server_error() => "server error".to_string(),
            _ => "invalid request".to_string(),
        };
        Err(UbqError::api(
            message,
            ApiResponse {
                status: status.as_u16(),
                url,
                body,
            },
        ))
    }
}

/// Classify a reqwest error into a UbqError variant.
fn classify_error(e: reqwest::Error) -> UbqError {
    if e.is_builder() {
        UbqError::InvalidUrl(e.to_string())
    } else if e.is_timeout() {
        UbqError::Network(format!("request timed out: {e}"))
    } else if e.is_connect() {
        UbqError::Network(format!("connection failed: {e}"))
    } else {
        UbqError::Network(e.to_string())
    }
}

/// Strip leading slashes so paths join cleanly onto a base ending with `/`.
pub(crate) fn clean_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

fn non_empty_base(configured: &str, fallback: &str) -> String {
    let normalized = normalize_base_url(configured);
    if normalized.is_empty() {
        fallback.to_string()
    } else {
        normalized
    }
}
