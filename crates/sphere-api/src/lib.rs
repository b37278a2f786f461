// sphere-api: Async Rust client for the Conference Sphere publications API

pub mod client;
pub mod credential;
pub mod error;
pub mod transport;
pub mod types;

pub use client::PublicationsClient;
pub use credential::Credential;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{Publication, PublicationInput, PublicationType};
