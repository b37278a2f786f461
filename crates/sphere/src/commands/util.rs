//! Shared helpers for command handlers.

use std::io::IsTerminal;

use chrono::NaiveDate;

use sphere_core::{Notification, PublicationForm, PublicationStore, PublicationType, date};

use crate::cli::{FieldArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Load the collection, turning a failed load into an error.
pub async fn load<B: sphere_core::PublicationBackend>(
    store: &PublicationStore<B>,
) -> Result<(), CliError> {
    let loaded = store.reload().await;
    if loaded.is_success() {
        tracing::debug!("{}", loaded.message);
        Ok(())
    } else {
        Err(CliError::from_notification(&loaded))
    }
}

/// Print a success notification, or turn a failure into an error.
pub fn finish(notification: &Notification, global: &GlobalOpts) -> Result<(), CliError> {
    if notification.is_success() {
        output::print_notification(notification, &global.color, global.quiet);
        Ok(())
    } else {
        Err(CliError::from_notification(notification))
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse a `YYYY-MM-DD` flag value.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), date::WIRE_DATE_FORMAT).map_err(|_| {
        CliError::Validation {
            field: field.into(),
            reason: format!("expected YYYY-MM-DD, got '{raw}'"),
        }
    })
}

/// Overlay the given flags onto a form. Unset flags leave fields alone.
pub fn apply_fields(form: &mut PublicationForm, fields: FieldArgs) -> Result<(), CliError> {
    if let Some(title) = fields.title {
        form.title = Some(title);
    }
    if let Some(kind) = fields.publication_type {
        form.publication_type = Some(PublicationType::from(kind));
    }
    if let Some(description) = fields.description {
        form.description = Some(description);
    }
    if let Some(location) = fields.location {
        form.location = Some(location);
    }
    if let Some(raw) = fields.submission_date {
        form.paper_submission_date = Some(parse_date("submission-date", &raw)?);
    }
    if let Some(raw) = fields.conference_date {
        form.conference_date = Some(parse_date("conference-date", &raw)?);
    }
    if let Some(link) = fields.link {
        form.external_link = Some(link);
    }
    if let Some(rank) = fields.rank {
        form.conference_rank = Some(rank);
    }
    Ok(())
}
