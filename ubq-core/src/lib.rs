//! Ubiquity Core - foundation types shared by the Ubiquity client crates.
//!
//! This crate provides:
//! - Client configuration (base URLs, credentials, tenant tokens, polling bounds)
//! - The `UbqError` taxonomy used across the client
//! - The `Credential` variant and JWT helpers
//! - Structured logging with tracing
//! - Common constants

pub mod config;
pub mod constants;
pub mod credential;
pub mod error;
pub mod logging;

// Re-export commonly used items at the crate root
pub use config::UbiquityConfig;
pub use credential::Credential;
pub use error::{ApiResponse, UbqError, UbqResult};
pub use logging::init_logging;
