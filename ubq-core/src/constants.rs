//! Client-wide constants.

/// Client name, used in the user agent.
pub const CLIENT_NAME: &str = "ubiquity-rs";

/// Client version.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Ubiquity API origin.
pub const DEFAULT_BASE_URL: &str = "https://cloud.liquid-state.com/";

/// Default bucket serving generated app configuration.
pub const DEFAULT_BASE_S3_URL: &str =
    "https://s3.ap-southeast-2.amazonaws.com/liquidstate-prod-apsoutheast2/";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default connect timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 15_000;

/// Poll interval for quick server transitions (new versions, readiness).
pub const FAST_POLL_INTERVAL_MS: u64 = 200;

/// Poll interval for slow server transitions (upload processing, publishing).
pub const SLOW_POLL_INTERVAL_MS: u64 = 2_000;

/// Default cap on probes per wait.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 300;

/// Default cap on total wait time in seconds.
pub const DEFAULT_MAX_WAIT_SECS: u64 = 600;

/// Consecutive transport failures tolerated while polling.
pub const DEFAULT_TRANSIENT_ERROR_BUDGET: u32 = 3;

/// Service name used when resolving URLs through a service locator.
pub const SERVICE_NAME: &str = "ubiquity";

/// Path prefixes for the API generations.
pub mod paths {
    /// v2 JSON API root.
    pub const V2: &str = "api/v2/";
    /// v1 core admin API root.
    pub const CORE_V1: &str = "api/core/v1/";
    /// v1 app-user API root.
    pub const APP_USERS_V1: &str = "api/appusers/v1/";
}

/// Environment variables overlaying file configuration.
pub mod env {
    pub const BASE_URL: &str = "UBIQUITY_BASE_URL";
    pub const BASE_S3_URL: &str = "UBIQUITY_BASE_S3_URL";
    pub const API_KEY: &str = "UBIQUITY_API_KEY";
    pub const JWT: &str = "UBIQUITY_JWT";
    pub const APP_TOKEN: &str = "UBIQUITY_APP_TOKEN";
    pub const COMPANY_TOKEN: &str = "UBIQUITY_COMPANY_TOKEN";
    pub const LOG_LEVEL: &str = "UBIQUITY_LOG_LEVEL";
}

/// Setting names read from an embedding host application.
pub mod host {
    pub const APP_TOKEN: &str = "app_token";
    pub const COMPANY_TOKEN: &str = "company_token";
    pub const BASE_URL: &str = super::env::BASE_URL;
    pub const BASE_S3_URL: &str = super::env::BASE_S3_URL;
}

/// User agent sent with every request.
pub fn user_agent() -> String {
    format!("{CLIENT_NAME}/{CLIENT_VERSION}")
}
