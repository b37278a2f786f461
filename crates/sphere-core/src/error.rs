// ── Core error types ──
//
// User-facing errors from sphere-core. Consumers never see reqwest errors
// or JSON parse failures directly. `from_api` keeps the distinction the
// transport layer knows about (validation vs. not-found vs. auth vs.
// network) instead of collapsing everything into one message.

use thiserror::Error;

use crate::notification::FailureKind;

/// Unified error type for the core crate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the publications service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to the publications service timed out")]
    Timeout,

    #[error("Not authorized: {message}")]
    Unauthorized { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Publication not found: {uuid}")]
    NotFound { uuid: String },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Rejected by the publications service (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("The publication store has been torn down")]
    StoreClosed,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Translate a transport-layer error. `uuid` names the record the call
    /// addressed, so a 404 can say which publication is gone.
    pub fn from_api(err: sphere_api::Error, uuid: Option<&str>) -> Self {
        use sphere_api::Error as Api;

        if err.is_not_found() {
            return Self::NotFound {
                uuid: uuid.unwrap_or("<unknown>").to_owned(),
            };
        }

        match err {
            Api::Unauthorized { message, .. } | Api::InvalidCredential(message) => {
                Self::Unauthorized { message }
            }
            Api::Api { status, message } => Self::Rejected { status, message },
            Api::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout
                } else if let Some(status) = e.status() {
                    Self::Rejected {
                        status: status.as_u16(),
                        message: e.to_string(),
                    }
                } else {
                    Self::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            Api::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            Api::Tls(reason) => Self::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {reason}"),
            },
            Api::Deserialization { message, body: _ } => {
                Self::Internal(format!("Unexpected response body: {message}"))
            }
        }
    }

    /// Coarse category used by notifications.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation { .. } => FailureKind::Validation,
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::Unauthorized { .. } => FailureKind::Unauthorized,
            Self::Rejected { status, .. } if matches!(*status, 400 | 409 | 422) => {
                FailureKind::Validation
            }
            Self::Rejected { .. } => FailureKind::Rejected,
            Self::ConnectionFailed { .. } | Self::Timeout => FailureKind::Transport,
            Self::StoreClosed => FailureKind::Cancelled,
            Self::Config { .. } | Self::Internal(_) => FailureKind::Internal,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sphere_api::Error> for CoreError {
    fn from(err: sphere_api::Error) -> Self {
        Self::from_api(err, None)
    }
}
