// Wire types for the `/publications` collection.
//
// Field names follow the server's camelCase JSON. Calendar dates stay
// `YYYY-MM-DD` strings here; parsing them is the core crate's job.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ── PublicationType ──────────────────────────────────────────────────

/// Kind of venue a publication targets.
///
/// Values the client does not know yet are kept verbatim in
/// [`Other`](Self::Other) so they survive an update round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PublicationType {
    Conference,
    Journal,
    Other(String),
}

impl PublicationType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Conference => "Conference",
            Self::Journal => "Journal",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for PublicationType {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("conference") {
            Self::Conference
        } else if s.eq_ignore_ascii_case("journal") {
            Self::Journal
        } else {
            Self::Other(s)
        }
    }
}

impl From<PublicationType> for String {
    fn from(t: PublicationType) -> Self {
        match t {
            PublicationType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl FromStr for PublicationType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl fmt::Display for PublicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Publication ──────────────────────────────────────────────────────

/// A publication record as stored by the server.
///
/// `id` and `uuid` are server-assigned. Every update and delete addresses
/// the record by `uuid`; `id` is carried along but never used as a handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: i64,
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub publication_type: PublicationType,
    /// `YYYY-MM-DD`, or `None` when the server has no date.
    #[serde(default)]
    pub paper_submission_date: Option<String>,
    /// `YYYY-MM-DD`, or `None` when the server has no date.
    #[serde(default)]
    pub conference_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default)]
    pub external_link: Option<String>,
    #[serde(default)]
    pub conference_rank: Option<String>,
}

impl Publication {
    /// Build the full record sent by an update: server identity plus the
    /// replacement field values.
    pub fn from_input(id: i64, uuid: impl Into<String>, input: PublicationInput) -> Self {
        Self {
            id,
            uuid: uuid.into(),
            title: input.title,
            description: input.description,
            publication_type: input.publication_type,
            paper_submission_date: input.paper_submission_date,
            conference_date: input.conference_date,
            location: input.location,
            external_link: input.external_link,
            conference_rank: input.conference_rank,
        }
    }

    /// The record's fields without its server identity.
    pub fn to_input(&self) -> PublicationInput {
        PublicationInput {
            title: self.title.clone(),
            description: self.description.clone(),
            publication_type: self.publication_type.clone(),
            paper_submission_date: self.paper_submission_date.clone(),
            conference_date: self.conference_date.clone(),
            location: self.location.clone(),
            external_link: self.external_link.clone(),
            conference_rank: self.conference_rank.clone(),
        }
    }
}

// ── PublicationInput ─────────────────────────────────────────────────

/// Payload accepted by create: a publication without `id` / `uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationInput {
    pub title: String,
    pub description: String,
    pub publication_type: PublicationType,
    pub paper_submission_date: Option<String>,
    pub conference_date: Option<String>,
    pub location: String,
    pub external_link: Option<String>,
    pub conference_rank: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn publication_deserializes_camel_case() {
        let raw = json!({
            "id": 7,
            "uuid": "7b1f0c1e-aaaa-bbbb-cccc-000000000007",
            "title": "Tech Innovate 2024",
            "description": "Annual tech summit",
            "publicationType": "Conference",
            "paperSubmissionDate": "2024-03-15",
            "conferenceDate": "2024-06-01",
            "location": "Colombo",
            "externalLink": "https://example.org/ti24",
            "conferenceRank": "A*"
        });

        let p: Publication = serde_json::from_value(raw).unwrap();
        assert_eq!(p.id, 7);
        assert_eq!(p.publication_type, PublicationType::Conference);
        assert_eq!(p.paper_submission_date.as_deref(), Some("2024-03-15"));
        assert_eq!(p.conference_rank.as_deref(), Some("A*"));
    }

    #[test]
    fn null_dates_round_trip_as_null() {
        let raw = json!({
            "id": 1,
            "uuid": "u-1",
            "title": "Draft",
            "description": null,
            "publicationType": "Journal",
            "paperSubmissionDate": null,
            "location": "Remote"
        });

        let p: Publication = serde_json::from_value(raw).unwrap();
        assert_eq!(p.description, "");
        assert_eq!(p.paper_submission_date, None);
        assert_eq!(p.conference_date, None);

        let back = serde_json::to_value(&p).unwrap();
        assert!(back["paperSubmissionDate"].is_null());
        assert!(back["conferenceDate"].is_null());
    }

    #[test]
    fn unknown_publication_type_is_preserved() {
        let t: PublicationType = serde_json::from_value(json!("Workshop")).unwrap();
        assert_eq!(t, PublicationType::Other("Workshop".into()));
        assert_eq!(serde_json::to_value(&t).unwrap(), json!("Workshop"));
    }

    #[test]
    fn known_publication_types_are_normalized() {
        assert_eq!(
            "journal".parse::<PublicationType>().unwrap(),
            PublicationType::Journal
        );
        assert_eq!(PublicationType::Conference.to_string(), "Conference");
    }

    #[test]
    fn from_input_keeps_identity_and_fields() {
        let input = PublicationInput {
            title: "Edge AI".into(),
            description: "Workshop paper".into(),
            publication_type: PublicationType::Conference,
            paper_submission_date: Some("2024-01-10".into()),
            conference_date: Some("2024-05-20".into()),
            location: "Kandy".into(),
            external_link: None,
            conference_rank: Some("B".into()),
        };

        let p = Publication::from_input(3, "u-3", input.clone());
        assert_eq!(p.uuid, "u-3");
        assert_eq!(p.to_input(), input);
    }
}
