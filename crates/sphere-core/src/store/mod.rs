// ── Publication store ──
//
// The snapshot cell and the store that owns it.

mod publication_store;
mod snapshot;

pub use publication_store::{PublicationStore, PurgeReport, StoreState};
pub use snapshot::Snapshot;
