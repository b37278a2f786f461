//! Publication store and synchronization logic for Conference Sphere.
//!
//! [`PublicationStore`] owns the local snapshot of the remote publications
//! collection. Every write is confirmed by the server and followed by a
//! full re-list; the snapshot is replaced wholesale, never patched.
//! Overlapping refreshes are ordered by sequence number so a late reply
//! never clobbers a newer listing.
//!
//! ```no_run
//! # async fn demo() -> Result<(), sphere_core::CoreError> {
//! use sphere_core::{Credential, PublicationStore, StoreConfig};
//!
//! let config = StoreConfig::new("https://api.example.org/".parse().map_err(|_| {
//!     sphere_core::CoreError::Config { message: "bad url".into() }
//! })?);
//! let store = PublicationStore::connect(&config)?;
//! let loaded = store.mount(Credential::bearer("token")).await;
//! println!("{loaded}");
//! for publication in store.set_search("tech") {
//!     println!("{}", publication.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod date;
pub mod error;
pub mod expiry;
pub mod form;
pub mod notification;
pub mod search;
pub mod store;
pub mod stream;

pub use backend::PublicationBackend;
pub use config::{StoreConfig, TlsVerification};
pub use error::CoreError;
pub use form::PublicationForm;
pub use notification::{FailureKind, Intent, Notification, NotificationLevel};
pub use store::{PublicationStore, PurgeReport, Snapshot, StoreState};
pub use stream::{SnapshotStream, SnapshotWatchStream};

// Wire types, re-exported so consumers need only this crate.
pub use sphere_api::{Credential, Publication, PublicationInput, PublicationType, PublicationsClient};
