// ── Remote collection seam ──
//
// The store talks to the publications service only through this trait.
// `PublicationsClient` is the production implementation; tests plug in
// scripted fakes.

use std::future::Future;

use sphere_api::{Credential, Error, Publication, PublicationInput, PublicationsClient};

/// The four logical operations on the remote collection.
pub trait PublicationBackend: Send + Sync + 'static {
    fn create(
        &self,
        input: &PublicationInput,
        credential: &Credential,
    ) -> impl Future<Output = Result<Publication, Error>> + Send;

    fn list(
        &self,
        credential: &Credential,
    ) -> impl Future<Output = Result<Vec<Publication>, Error>> + Send;

    fn update(
        &self,
        uuid: &str,
        record: &Publication,
        credential: &Credential,
    ) -> impl Future<Output = Result<Publication, Error>> + Send;

    fn delete(
        &self,
        uuid: &str,
        credential: &Credential,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

impl PublicationBackend for PublicationsClient {
    fn create(
        &self,
        input: &PublicationInput,
        credential: &Credential,
    ) -> impl Future<Output = Result<Publication, Error>> + Send {
        PublicationsClient::create(self, input, credential)
    }

    fn list(
        &self,
        credential: &Credential,
    ) -> impl Future<Output = Result<Vec<Publication>, Error>> + Send {
        PublicationsClient::list(self, credential)
    }

    fn update(
        &self,
        uuid: &str,
        record: &Publication,
        credential: &Credential,
    ) -> impl Future<Output = Result<Publication, Error>> + Send {
        PublicationsClient::update(self, uuid, record, credential)
    }

    fn delete(
        &self,
        uuid: &str,
        credential: &Credential,
    ) -> impl Future<Output = Result<(), Error>> + Send {
        PublicationsClient::delete(self, uuid, credential)
    }
}
