// Async HTTP client for the publications REST collection.
//
//   POST   /publications          create
//   GET    /publications          list
//   PUT    /publication/{uuid}    update (full replace)
//   DELETE /publication/{uuid}    delete
//
// Stateless: the credential is supplied per call.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::types::{Publication, PublicationInput};
use crate::{Credential, Error, TransportConfig};

const COLLECTION: &str = "publications";
const RECORD: &str = "publication";
const ERROR_PREVIEW_CHARS: usize = 200;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the publications collection.
///
/// Holds no state across calls beyond the connection pool; every
/// operation carries its own [`Credential`].
#[derive(Debug, Clone)]
pub struct PublicationsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PublicationsClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` with a fresh `reqwest::Client`.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Parse the base URL and make sure its path ends with `/`, so the
    /// collection lands under it (`https://host/api/` → `/api/publications`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL. Segments are percent-encoded,
    /// so a uuid can never escape its position in the path.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Cannot-be-a-base URLs are rejected in `normalize_base_url`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── Request plumbing ─────────────────────────────────────────────

    fn authorize(request: RequestBuilder, credential: &Credential) -> Result<RequestBuilder, Error> {
        let (name, value) = credential.header()?;
        Ok(request.header(name, value))
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(ERROR_PREVIEW_CHARS).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|err| err.message.or(err.error))
            .unwrap_or_else(|| {
                if raw.trim().is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        let status = status.as_u16();
        match status {
            401 | 403 => Error::Unauthorized { status, message },
            _ => Error::Api { status, message },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Create a publication. The returned record carries the
    /// server-assigned `id` and `uuid`.
    pub async fn create(
        &self,
        input: &PublicationInput,
        credential: &Credential,
    ) -> Result<Publication, Error> {
        let url = self.url(&[COLLECTION]);
        debug!("POST {url}");

        let req = Self::authorize(self.http.post(url), credential)?;
        let resp = req.json(input).send().await?;
        Self::handle_response(resp).await
    }

    /// Fetch the full collection, in server order. An empty collection is
    /// a valid result.
    pub async fn list(&self, credential: &Credential) -> Result<Vec<Publication>, Error> {
        let url = self.url(&[COLLECTION]);
        debug!("GET {url}");

        let req = Self::authorize(self.http.get(url), credential)?;
        let resp = req.send().await?;
        Self::handle_response(resp).await
    }

    /// Replace the record at `uuid` with `record`.
    pub async fn update(
        &self,
        uuid: &str,
        record: &Publication,
        credential: &Credential,
    ) -> Result<Publication, Error> {
        let url = self.url(&[RECORD, uuid]);
        debug!("PUT {url}");

        let req = Self::authorize(self.http.put(url), credential)?;
        let resp = req.json(record).send().await?;
        Self::handle_response(resp).await
    }

    /// Delete the record at `uuid`. A 404 is reported as an error like any
    /// other status; callers decide what "already gone" means.
    pub async fn delete(&self, uuid: &str, credential: &Credential) -> Result<(), Error> {
        let url = self.url(&[RECORD, uuid]);
        debug!("DELETE {url}");

        let req = Self::authorize(self.http.delete(url), credential)?;
        let resp = req.send().await?;
        Self::handle_empty(resp).await
    }
}
