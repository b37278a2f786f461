// ── Runtime store configuration ──
//
// Describes where the publications service lives and how to talk to it.
// Never touches disk: the CLI (via sphere-config) builds a `StoreConfig`
// and hands it to `PublicationStore::connect`.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use sphere_api::{Credential, TlsMode, TransportConfig};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Only for local development servers.
    DangerAcceptInvalid,
}

impl From<TlsVerification> for TlsMode {
    fn from(tls: TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => Self::System,
            TlsVerification::CustomCa(path) => Self::CustomCa(path),
            TlsVerification::DangerAcceptInvalid => Self::DangerAcceptInvalid,
        }
    }
}

/// Configuration for one publications service.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the REST collection (e.g. `https://api.example.org/v1/`).
    pub api_url: Url,
    /// Credential used by `mount`. `None` leaves the store signed out.
    pub credential: Option<Credential>,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl StoreConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            credential: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone().into(),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_tls_and_thirty_seconds() {
        let cfg = StoreConfig::new("https://api.example.org/".parse().unwrap());
        assert_eq!(cfg.tls, TlsVerification::SystemDefaults);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.credential.is_none());

        let transport = cfg.transport();
        assert!(matches!(transport.tls, TlsMode::System));
    }
}
