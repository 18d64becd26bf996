//! Credentials accepted by the Ubiquity API.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{UbqError, UbqResult};

/// How a client instance authenticates.
///
/// A client holds exactly one credential; API keys and bearer tokens are
/// never combined.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Long-lived API key, sent as `Authorization: Token <key>`.
    ApiKey(String),
    /// User JWT, sent as `Authorization: Bearer <jwt>`.
    BearerToken(String),
}

impl Credential {
    /// Pick a credential from optional configured values.
    ///
    /// An API key takes precedence over a JWT. Blank values count as absent.
    pub fn from_parts(api_key: Option<&str>, jwt: Option<&str>) -> Option<Self> {
        let present = |v: Option<&str>| v.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        present(api_key)
            .map(Credential::ApiKey)
            .or_else(|| present(jwt).map(Credential::BearerToken))
    }

    /// Authorization scheme keyword.
    pub fn scheme(&self) -> &'static str {
        match self {
            Credential::ApiKey(_) => "Token",
            Credential::BearerToken(_) => "Bearer",
        }
    }

    /// The raw secret.
    pub fn secret(&self) -> &str {
        match self {
            Credential::ApiKey(s) | Credential::BearerToken(s) => s,
        }
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.scheme(), self.secret())
    }

    /// The JWT, if this is a bearer credential.
    pub fn jwt(&self) -> Option<&str> {
        match self {
            Credential::BearerToken(jwt) => Some(jwt),
            Credential::ApiKey(_) => None,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::ApiKey(_) => f.write_str("ApiKey(***)"),
            Credential::BearerToken(_) => f.write_str("BearerToken(***)"),
        }
    }
}

/// Extract the `sub` claim from a JWT without verifying it.
///
/// The server verifies tokens; the client only needs the subject to build
/// per-user configuration URLs.
pub fn jwt_subject(jwt: &str) -> UbqResult<String> {
    let payload = jwt
        .split('.')
        .nth(1)
        .ok_or_else(|| UbqError::Auth("malformed jwt: missing payload".into()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| UbqError::Auth(format!("malformed jwt payload: {e}")))?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes)?;
    match claims.get("sub") {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        _ => Err(UbqError::Auth("jwt has no subject".into())),
    }
}
