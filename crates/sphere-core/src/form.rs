// ── Publication form schema ──
//
// Raw values as a form holds them, and the presence rules a submission
// must satisfy before any call is made.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use sphere_api::{Publication, PublicationInput, PublicationType};

use crate::date;
use crate::error::CoreError;

/// Values of the create / edit form.
///
/// Dates are widget values (`NaiveDate`); they become `YYYY-MM-DD` strings
/// only in [`validate`](Self::validate).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationForm {
    pub title: Option<String>,
    pub publication_type: Option<PublicationType>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub paper_submission_date: Option<NaiveDate>,
    pub conference_date: Option<NaiveDate>,
    pub external_link: Option<String>,
    pub conference_rank: Option<String>,
}

impl PublicationForm {
    /// Load a stored record into an edit form.
    ///
    /// A stored date that does not parse leaves its widget empty, so the
    /// form must be given a new date before it validates.
    pub fn from_publication(publication: &Publication) -> Self {
        let uuid = publication.uuid.as_str();
        Self {
            title: Some(publication.title.clone()),
            publication_type: Some(publication.publication_type.clone()),
            description: Some(publication.description.clone()),
            location: Some(publication.location.clone()),
            paper_submission_date: widget_date(
                publication.paper_submission_date.as_deref(),
                "paperSubmissionDate",
                uuid,
            ),
            conference_date: widget_date(
                publication.conference_date.as_deref(),
                "conferenceDate",
                uuid,
            ),
            external_link: publication.external_link.clone(),
            conference_rank: publication.conference_rank.clone(),
        }
    }

    /// Check presence rules and build the payload for create / update.
    ///
    /// Required: title, type, description, location, both dates.
    /// Optional: external link and rank (blank becomes `None`).
    /// The first missing field, in form order, is reported.
    pub fn validate(&self) -> Result<PublicationInput, CoreError> {
        let title = required_text(self.title.as_deref(), "title")?;
        let publication_type = match &self.publication_type {
            Some(PublicationType::Other(s)) if s.trim().is_empty() => None,
            other => other.clone(),
        }
        .ok_or_else(|| missing("publicationType"))?;
        let description = required_text(self.description.as_deref(), "description")?;
        let location = required_text(self.location.as_deref(), "location")?;
        let paper_submission_date = self
            .paper_submission_date
            .ok_or_else(|| missing("paperSubmissionDate"))?;
        let conference_date = self
            .conference_date
            .ok_or_else(|| missing("conferenceDate"))?;

        Ok(PublicationInput {
            title,
            description,
            publication_type,
            paper_submission_date: Some(date::format_wire_date(paper_submission_date)),
            conference_date: Some(date::format_wire_date(conference_date)),
            location,
            external_link: optional_text(self.external_link.as_deref()),
            conference_rank: optional_text(self.conference_rank.as_deref()),
        })
    }
}

fn missing(field: &str) -> CoreError {
    CoreError::validation(field, "is required")
}

fn widget_date(raw: Option<&str>, field: &str, uuid: &str) -> Option<NaiveDate> {
    date::parse_optional_wire_date(raw).unwrap_or_else(|e| {
        warn!(uuid, field, error = %e, "stored date unreadable; leaving it empty");
        None
    })
}

fn required_text(value: Option<&str>, field: &str) -> Result<String, CoreError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| missing(field))
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
