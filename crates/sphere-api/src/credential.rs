use reqwest::header::{AUTHORIZATION, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::Error;

/// Header used by service accounts (scheduled jobs) instead of a user token.
const API_KEY_HEADER: &str = "api-key";

/// Credential attached to every call.
///
/// Opaque to this crate: it is never inspected, decoded, or refreshed. An
/// expired or revoked credential simply surfaces as [`Error::Unauthorized`].
#[derive(Debug, Clone)]
pub enum Credential {
    /// Access token from the identity provider, sent as
    /// `Authorization: Bearer <token>`.
    Bearer(SecretString),

    /// Service API key, sent as an `API-Key` header.
    ApiKey(SecretString),
}

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(SecretString::from(token.into()))
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(SecretString::from(key.into()))
    }

    /// The header this credential is sent as. The value is marked sensitive
    /// so it never shows up in reqwest's debug output.
    pub(crate) fn header(&self) -> Result<(HeaderName, HeaderValue), Error> {
        let (name, raw) = match self {
            Self::Bearer(token) => (AUTHORIZATION, format!("Bearer {}", token.expose_secret())),
            Self::ApiKey(key) => (
                HeaderName::from_static(API_KEY_HEADER),
                key.expose_secret().to_owned(),
            ),
        };

        let mut value = HeaderValue::from_str(&raw)
            .map_err(|e| Error::InvalidCredential(format!("invalid header value: {e}")))?;
        value.set_sensitive(true);
        Ok((name, value))
    }
}
