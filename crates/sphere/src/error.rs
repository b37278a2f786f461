//! CLI error types with miette diagnostics.
//!
//! Maps core, config, and intent failures into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use sphere_config::ConfigError;
use sphere_core::{CoreError, FailureKind, Notification};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    /// The change went through but the listing could not be refreshed.
    pub const STALE: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the publications service at {url}")]
    #[diagnostic(
        code(sphere::connection_failed),
        help(
            "Check the API URL and your network.\n\
             Reason: {reason}\n\
             For a self-signed development server try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(sphere::timeout),
        help("Increase the timeout with --timeout or check the service's responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Not authorized: {message}")]
    #[diagnostic(
        code(sphere::auth_failed),
        help(
            "Your token may have expired. Store a fresh one with:\n\
             sphere config set-token --for-profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(sphere::no_credentials),
        help(
            "Configure credentials with: sphere config init\n\
             Or pass --token / set SPHERE_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Publication '{uuid}' not found")]
    #[diagnostic(
        code(sphere::not_found),
        help("Run: sphere list to see available publications")
    )]
    NotFound { uuid: String },

    // ── Intents ──────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(sphere::intent_failed), help("{hint}"))]
    IntentFailed {
        message: String,
        hint: String,
        kind: FailureKind,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sphere::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sphere::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sphere config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No publications service configured")]
    #[diagnostic(
        code(sphere::no_config),
        help(
            "Create a profile with: sphere config init\n\
             Or pass --api-url and --token.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(sphere::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(sphere::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(sphere::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(sphere::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::IntentFailed { kind, .. } => exit_code_for(*kind),
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Turn a failure notification into an error carrying its category.
    pub fn from_notification(notification: &Notification) -> Self {
        let kind = notification.failure.unwrap_or(FailureKind::Internal);
        let detail = notification.detail.clone().unwrap_or_default();
        let hint = match kind {
            FailureKind::Validation => format!("The input was rejected: {detail}"),
            FailureKind::NotFound => {
                format!("{detail}\nRun: sphere list to see available publications")
            }
            FailureKind::Unauthorized => format!(
                "{detail}\nYour token may have expired; store a fresh one with: sphere config set-token"
            ),
            FailureKind::Transport => format!("{detail}\nCheck the API URL and your network."),
            FailureKind::StaleView => format!(
                "{detail}\nThe change was saved. Run: sphere list to see the current state."
            ),
            FailureKind::Rejected | FailureKind::Cancelled | FailureKind::Internal => detail,
        };
        Self::IntentFailed {
            message: notification.message.clone(),
            hint,
            kind,
        }
    }
}

fn exit_code_for(kind: FailureKind) -> i32 {
    match kind {
        FailureKind::Validation => exit_code::USAGE,
        FailureKind::NotFound => exit_code::NOT_FOUND,
        FailureKind::Unauthorized => exit_code::AUTH,
        FailureKind::Transport => exit_code::CONNECTION,
        FailureKind::StaleView => exit_code::STALE,
        FailureKind::Rejected | FailureKind::Cancelled | FailureKind::Internal => {
            exit_code::GENERAL
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::Unauthorized { message } => Self::AuthFailed {
                profile: "<active>".into(),
                message,
            },
            CoreError::NotFound { uuid } => Self::NotFound { uuid },
            CoreError::Validation { field, reason } => Self::Validation { field, reason },
            CoreError::Rejected { status, message } => Self::IntentFailed {
                message: format!("Rejected by the service (HTTP {status})"),
                hint: message,
                kind: FailureKind::Rejected,
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::StoreClosed | CoreError::Internal(_) => Self::IntentFailed {
                message: err.to_string(),
                hint: String::new(),
                kind: FailureKind::Internal,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}
