#![allow(clippy::unwrap_used)]

// PublicationStore wired to the real HTTP client against a mock server.

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sphere_core::{
    Credential, FailureKind, PublicationForm, PublicationStore, PublicationType, StoreConfig,
};

fn listing(titles: &[(&str, &str)]) -> serde_json::Value {
    json!(
        titles
            .iter()
            .enumerate()
            .map(|(i, (uuid, title))| json!({
                "id": i + 1,
                "uuid": uuid,
                "title": title,
                "description": "",
                "publicationType": "Conference",
                "paperSubmissionDate": "2024-03-15",
                "conferenceDate": null,
                "location": "Galle",
                "externalLink": null,
                "conferenceRank": null
            }))
            .collect::<Vec<_>>()
    )
}

fn config(server: &MockServer, timeout: Duration) -> StoreConfig {
    let mut config = StoreConfig::new(format!("{}/api/", server.uri()).parse().unwrap());
    config.timeout = timeout;
    config.with_credential(Credential::bearer("tok-123"))
}

fn form() -> PublicationForm {
    PublicationForm {
        title: Some("Edge Computing Days".into()),
        publication_type: Some(PublicationType::Conference),
        description: Some("Call for papers".into()),
        location: Some("Galle".into()),
        paper_submission_date: NaiveDate::from_ymd_opt(2024, 3, 15),
        conference_date: NaiveDate::from_ymd_opt(2024, 8, 20),
        external_link: None,
        conference_rank: None,
    }
}

#[tokio::test]
async fn reload_and_create_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/publications"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[("u-1", "Existing")])))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/publications"))
        .and(body_partial_json(json!({
            "title": "Edge Computing Days",
            "paperSubmissionDate": "2024-03-15",
            "conferenceDate": "2024-08-20"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 2,
            "uuid": "u-2",
            "title": "Edge Computing Days",
            "description": "Call for papers",
            "publicationType": "Conference",
            "paperSubmissionDate": "2024-03-15",
            "conferenceDate": "2024-08-20",
            "location": "Galle"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/publications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[
            ("u-1", "Existing"),
            ("u-2", "Edge Computing Days"),
        ])))
        .with_priority(2)
        .mount(&server)
        .await;

    let store = PublicationStore::connect(&config(&server, Duration::from_secs(5))).unwrap();
    let loaded = store.reload().await;
    assert!(loaded.is_success(), "{loaded}");
    assert_eq!(store.snapshot().len(), 1);

    let created = store.create(&form()).await;
    assert!(created.is_success(), "{created}");
    assert!(store.find("u-2").is_some());
    assert_eq!(store.search("edge").len(), 1);
}

#[tokio::test]
async fn refresh_timeout_after_create_keeps_old_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/publications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(&[("u-1", "Existing")])))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/publications"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 2,
            "uuid": "u-2",
            "title": "Edge Computing Days",
            "publicationType": "Conference"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/publications"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(&[]))
                .set_delay(Duration::from_secs(3)),
        )
        .with_priority(2)
        .mount(&server)
        .await;

    let store = PublicationStore::connect(&config(&server, Duration::from_millis(300))).unwrap();
    assert!(store.reload().await.is_success());
    let mut rx = store.notifications();

    let n = store.create(&form()).await;

    assert_eq!(n.failure, Some(FailureKind::StaleView));
    assert_eq!(store.snapshot().len(), 1);
    assert!(store.find("u-2").is_none());
    assert_eq!(rx.try_recv().unwrap(), n);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn unauthorized_listing_is_reported_as_such() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/publications"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .mount(&server)
        .await;

    let store = PublicationStore::connect(&config(&server, Duration::from_secs(5))).unwrap();
    let n = store.reload().await;

    assert_eq!(n.failure, Some(FailureKind::Unauthorized));
    assert!(n.detail.unwrap().contains("jwt expired"));
    assert!(store.snapshot().is_empty());
}
