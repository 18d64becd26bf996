//! Ubiquity API - HTTP client for the Ubiquity content platform.
//!
//! This crate provides typed clients for both API generations: the v2 admin
//! surface (apps, content items, versions, uploads, publishing), the v2
//! public content lookups, and the v1 admin and app-user endpoints. Server
//! operations that finish asynchronously are awaited with a bounded,
//! cancellable [`Waiter`]; listings are walked with a [`Paginator`].

pub mod admin;
pub mod client;
pub mod endpoints;
pub mod identity;
pub mod legacy;
pub mod paginator;
pub mod public;
pub mod waiter;

// Re-export key types
pub use admin::AdminClient;
pub use client::{ApiRequest, Auth, RequestBody, RequestExecutor};
pub use endpoints::content::ContentItemApi;
pub use endpoints::uploads::UploadApi;
pub use identity::{IdentityProvider, StaticIdentity};
pub use legacy::{AppUserClient, LegacyAdminClient, MessageHistory};
pub use paginator::Paginator;
pub use public::PublicClient;
pub use waiter::{PollStatus, WaitPolicy, Waiter};
