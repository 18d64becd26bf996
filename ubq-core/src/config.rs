//! Client configuration.
//!
//! Configuration is read from TOML on disk and overlaid with `UBIQUITY_*`
//! environment variables, so the same client can be pointed at staging or
//! production without code changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::credential::Credential;
use crate::error::{UbqError, UbqResult};

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UbiquityConfig {
    /// Server endpoints and transport settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Credentials.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Tenant tokens for the app-user surface.
    #[serde(default)]
    pub app: AppConfig,

    /// Waiter bounds.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// API origin, e.g. "https://cloud.liquid-state.com/".
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bucket serving generated app configuration.
    #[serde(default = "default_base_s3_url")]
    pub base_s3_url: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Extra headers sent with every API request.
    #[serde(default)]
    pub custom_headers: HashMap<String, String>,
}

/// Credential configuration. Only one credential is ever used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// API key; wins over `jwt` when both are set.
    #[serde(default)]
    pub api_key: Option<String>,

    /// User JWT.
    #[serde(default)]
    pub jwt: Option<String>,
}

/// Tenant tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub company_token: String,

    #[serde(default)]
    pub app_token: String,
}

/// Bounds applied to every eventual-consistency wait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Interval for quick transitions (milliseconds).
    #[serde(default = "default_fast_interval")]
    pub fast_interval_ms: u64,

    /// Interval for uploads and publishing (milliseconds).
    #[serde(default = "default_slow_interval")]
    pub slow_interval_ms: u64,

    /// Maximum probes per wait.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Maximum total wait in seconds.
    #[serde(default = "default_max_wait")]
    pub max_wait_secs: u64,

    /// Consecutive transport failures tolerated before giving up.
    #[serde(default = "default_transient_budget")]
    pub transient_error_budget: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, log to the console only.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured file output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_base_url() -> String {
    constants::DEFAULT_BASE_URL.to_string()
}

fn default_base_s3_url() -> String {
    constants::DEFAULT_BASE_S3_URL.to_string()
}

fn default_timeout() -> u64 {
    constants::DEFAULT_TIMEOUT_MS
}

fn default_connect_timeout() -> u64 {
    constants::DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_fast_interval() -> u64 {
    constants::FAST_POLL_INTERVAL_MS
}

fn default_slow_interval() -> u64 {
    constants::SLOW_POLL_INTERVAL_MS
}

fn default_max_attempts() -> u32 {
    constants::DEFAULT_MAX_POLL_ATTEMPTS
}

fn default_max_wait() -> u64 {
    constants::DEFAULT_MAX_WAIT_SECS
}

fn default_transient_budget() -> u32 {
    constants::DEFAULT_TRANSIENT_ERROR_BUDGET
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            base_s3_url: default_base_s3_url(),
            timeout_ms: default_timeout(),
            connect_timeout_ms: default_connect_timeout(),
            custom_headers: HashMap::new(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            fast_interval_ms: default_fast_interval(),
            slow_interval_ms: default_slow_interval(),
            max_attempts: default_max_attempts(),
            max_wait_secs: default_max_wait(),
            transient_error_budget: default_transient_budget(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl ServerConfig {
    /// Config pointing at a specific origin, all else default.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl IdentityConfig {
    /// Resolve the configured credential (API key first).
    pub fn credential(&self) -> Option<Credential> {
        Credential::from_parts(self.api_key.as_deref(), self.jwt.as_deref())
    }
}

impl PollingConfig {
    pub fn fast_interval(&self) -> Duration {
        Duration::from_millis(self.fast_interval_ms)
    }

    pub fn slow_interval(&self) -> Duration {
        Duration::from_millis(self.slow_interval_ms)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }
}

impl UbiquityConfig {
    /// Load configuration from the default file (if present), then the environment.
    pub fn load_default() -> UbqResult<Self> {
        let path = Self::default_config_path()?;
        let config = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };
        Ok(config.apply_env())
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> UbqResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: UbiquityConfig = toml::from_str(&contents)?;
        config.normalize();
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> UbqResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| UbqError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> UbqResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| UbqError::Config("could not determine config directory".into()))?;
        Ok(base.join("ubiquity").join("config.toml"))
    }

    /// Overlay values from `UBIQUITY_*` environment variables.
    pub fn apply_env(self) -> Self {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay values looked up by their `UBIQUITY_*` names. Non-empty values
    /// replace whatever the file set.
    pub fn apply_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        use constants::env;

        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(env::BASE_URL) {
            self.server.base_url = v;
        }
        if let Some(v) = get(env::BASE_S3_URL) {
            self.server.base_s3_url = v;
        }
        if let Some(v) = get(env::API_KEY) {
            self.identity.api_key = Some(v);
        }
        if let Some(v) = get(env::JWT) {
            self.identity.jwt = Some(v);
        }
        if let Some(v) = get(env::APP_TOKEN) {
            self.app.app_token = v;
        }
        if let Some(v) = get(env::COMPANY_TOKEN) {
            self.app.company_token = v;
        }
        if let Some(v) = get(env::LOG_LEVEL) {
            self.logging.level = v;
        }
        self.normalize();
        self
    }

    /// Fill gaps from a host application's settings (`app_token`,
    /// `company_token`, `UBIQUITY_BASE_URL`, `UBIQUITY_BASE_S3_URL`).
    ///
    /// Values already configured win; an origin counts as configured once it
    /// differs from the built-in default.
    pub fn merge_host_settings<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        use constants::host;

        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if self.app.app_token.is_empty() {
            if let Some(v) = get(host::APP_TOKEN) {
                self.app.app_token = v;
            }
        }
        if self.app.company_token.is_empty() {
            if let Some(v) = get(host::COMPANY_TOKEN) {
                self.app.company_token = v;
            }
        }
        if self.server.base_url == default_base_url() {
            if let Some(v) = get(host::BASE_URL) {
                self.server.base_url = v;
            }
        }
        if self.server.base_s3_url == default_base_s3_url() {
            if let Some(v) = get(host::BASE_S3_URL) {
                self.server.base_s3_url = v;
            }
        }
        self.normalize();
        self
    }

    /// Resolve the configured credential, failing if none is set.
    pub fn require_credential(&self) -> UbqResult<Credential> {
        self.identity.credential().ok_or_else(|| {
            UbqError::MissingConfig("identity.api_key or identity.jwt".into())
        })
    }

    /// Check that tenant tokens are present.
    pub fn require_app_tokens(&self) -> UbqResult<(&str, &str)> {
        if self.app.company_token.is_empty() {
            return Err(UbqError::MissingConfig("app.company_token".into()));
        }
        if self.app.app_token.is_empty() {
            return Err(UbqError::MissingConfig("app.app_token".into()));
        }
        Ok((&self.app.company_token, &self.app.app_token))
    }

    fn normalize(&mut self) {
        self.server.base_url = normalize_base_url(&self.server.base_url);
        self.server.base_s3_url = normalize_base_url(&self.server.base_s3_url);
        if self.server.base_url.is_empty() {
            self.server.base_url = default_base_url();
        }
        if self.server.base_s3_url.is_empty() {
            self.server.base_s3_url = default_base_s3_url();
        }
    }
}

/// Trim whitespace and quotes and make sure the URL ends with exactly one `/`.
///
/// Every endpoint path is appended without a leading slash, so the base must
/// carry the trailing one.
pub fn normalize_base_url(address: &str) -> String {
    let trimmed = address.trim().trim_matches('"').trim();
    if trimmed.is_empty() {
        return String::new();
    }
    format!("{}/", trimmed.trim_end_matches('/'))
}
