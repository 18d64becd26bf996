//! The v1 API generation.
//!
//! `admin` covers the core admin endpoints under `api/core/v1/`; `app_users`
//! covers the endpoints apps call on behalf of their users, plus the
//! generated configuration served from the bucket.

pub mod admin;
pub mod app_users;
pub mod urls;

pub use admin::LegacyAdminClient;
pub use app_users::{AppUserClient, MessageHistory};
pub use urls::{Endpoint, PathMapResolver, UrlResolver};
