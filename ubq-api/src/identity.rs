//! Sources of user JWTs for the app-user surface.

use async_trait::async_trait;

use ubq_core::error::UbqResult;

/// Supplies the current user's JWT, if one is signed in.
///
/// Implement this to plug in a session manager that refreshes tokens; the
/// client asks for a token before each call that needs one.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn jwt(&self) -> UbqResult<Option<String>>;
}

/// A fixed token, or no user at all.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    jwt: Option<String>,
}

impl StaticIdentity {
    pub fn new(jwt: impl Into<String>) -> Self {
        Self {
            jwt: Some(jwt.into()),
        }
    }

    /// No signed-in user.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn jwt(&self) -> UbqResult<Option<String>> {
        Ok(self.jwt.clone())
    }
}
