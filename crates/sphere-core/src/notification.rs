// ── User-visible notifications ──
//
// Every intent ends in exactly one notification. Failures keep their
// category so the UI can word them differently if it wants to.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// The user intent a notification reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    Load,
    Create,
    Update,
    Delete,
    PurgeExpired,
}

impl Intent {
    fn success_message(self) -> &'static str {
        match self {
            Self::Load => "Publications loaded",
            Self::Create => "Publication created successfully!",
            Self::Update => "Publication updated successfully!",
            Self::Delete => "Publication deleted successfully!",
            Self::PurgeExpired => "Expired publications removed",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "Error loading publications!",
            Self::Create => "Error creating publication!",
            Self::Update => "Error updating publication!",
            Self::Delete => "Error deleting publication!",
            Self::PurgeExpired => "Error removing expired publications!",
        }
    }

    fn stale_message(self) -> &'static str {
        match self {
            Self::Create => "Publication created, but the list could not be refreshed",
            Self::Update => "Publication updated, but the list could not be refreshed",
            Self::Delete => "Publication deleted, but the list could not be refreshed",
            Self::PurgeExpired => {
                "Expired publications removed, but the list could not be refreshed"
            }
            Self::Load => "Error loading publications!",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Load => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::PurgeExpired => "purge-expired",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationLevel {
    Success,
    Failure,
}

/// Why an intent failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// Input rejected, locally or by the server.
    Validation,
    /// The addressed uuid is not in the collection.
    NotFound,
    /// Missing, expired, or rejected credential.
    Unauthorized,
    /// Any other non-2xx answer.
    Rejected,
    /// Network failure or timeout.
    Transport,
    /// The write went through but the follow-up refresh failed; the
    /// displayed list is older than the server's.
    StaleView,
    /// The store was torn down while the intent was in flight.
    Cancelled,
    Internal,
}

/// Outcome of a single intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub intent: Intent,
    pub level: NotificationLevel,
    pub message: String,
    /// Set for failures only.
    pub failure: Option<FailureKind>,
    /// Underlying error text, for failures.
    pub detail: Option<String>,
}

impl Notification {
    pub fn success(intent: Intent) -> Self {
        Self::success_with(intent, intent.success_message())
    }

    pub fn success_with(intent: Intent, message: impl Into<String>) -> Self {
        Self {
            intent,
            level: NotificationLevel::Success,
            message: message.into(),
            failure: None,
            detail: None,
        }
    }

    pub fn failure(intent: Intent, error: &CoreError) -> Self {
        Self {
            intent,
            level: NotificationLevel::Failure,
            message: intent.failure_message().to_owned(),
            failure: Some(error.kind()),
            detail: Some(error.to_string()),
        }
    }

    /// The write succeeded, the refresh after it did not.
    pub fn stale_view(intent: Intent, error: &CoreError) -> Self {
        Self {
            intent,
            level: NotificationLevel::Failure,
            message: intent.stale_message().to_owned(),
            failure: Some(FailureKind::StaleView),
            detail: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NotificationLevel::Success
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({detail})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_is_never_success_styled() {
        let n = Notification::failure(Intent::Delete, &CoreError::NotFound { uuid: "u".into() });
        assert_eq!(n.level, NotificationLevel::Failure);
        assert!(!n.is_success());
        assert_eq!(n.message, "Error deleting publication!");
        assert_eq!(n.failure, Some(FailureKind::NotFound));
    }

    #[test]
    fn stale_view_reports_the_write_and_the_refresh() {
        let n = Notification::stale_view(Intent::Create, &CoreError::Timeout);
        assert_eq!(n.failure, Some(FailureKind::StaleView));
        assert!(n.message.starts_with("Publication created"));
        assert!(n.to_string().contains("timed out"));
    }
}
