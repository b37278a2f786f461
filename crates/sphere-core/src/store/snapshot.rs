// ── Snapshot cell ──
//
// The single shared mutable resource: the last applied server listing.
// It is replaced wholesale, never patched, and only by a refresh whose
// sequence number is newer than the one already applied.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use sphere_api::Publication;

/// An immutable listing of the collection, as returned by one `list()` call.
#[derive(Debug, Default)]
pub struct Snapshot {
    seq: u64,
    items: Vec<Arc<Publication>>,
    by_uuid: HashMap<String, usize>,
    fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    fn new(seq: u64, items: Vec<Publication>) -> Self {
        let items: Vec<Arc<Publication>> = items.into_iter().map(Arc::new).collect();
        let by_uuid = items
            .iter()
            .enumerate()
            .map(|(i, p)| (p.uuid.clone(), i))
            .collect();
        Self {
            seq,
            items,
            by_uuid,
            fetched_at: Some(Utc::now()),
        }
    }

    /// Records in server order.
    pub fn items(&self) -> &[Arc<Publication>] {
        &self.items
    }

    pub fn get(&self, uuid: &str) -> Option<&Arc<Publication>> {
        self.by_uuid.get(uuid).and_then(|&i| self.items.get(i))
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.by_uuid.contains_key(uuid)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sequence number of the refresh that produced this listing; 0 before
    /// the first successful load.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// When the listing arrived. `None` until the first load.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}

/// What happened to a refresh result handed to [`SnapshotCell::replace_if_newer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Apply {
    Applied,
    /// A newer refresh already landed; this result was dropped.
    Stale { current: u64 },
    /// The store was torn down.
    Closed,
}

pub(crate) struct SnapshotCell {
    tx: watch::Sender<Arc<Snapshot>>,
    closed: AtomicBool,
}

impl SnapshotCell {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(Snapshot::default()));
        Self {
            tx,
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn current(&self) -> Arc<Snapshot> {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }

    /// Install `items` as the new snapshot if `seq` is newer than the one
    /// currently held. Check and swap happen under the channel's lock.
    pub(crate) fn replace_if_newer(&self, seq: u64, items: Vec<Publication>) -> Apply {
        let mut outcome = Apply::Closed;
        self.tx.send_if_modified(|snap| {
            if self.closed.load(Ordering::Acquire) {
                outcome = Apply::Closed;
                return false;
            }
            if seq <= snap.seq {
                outcome = Apply::Stale { current: snap.seq };
                return false;
            }
            *snap = Arc::new(Snapshot::new(seq, items));
            outcome = Apply::Applied;
            true
        });
        outcome
    }

    /// Refuse every later write. Returns once any write already holding the
    /// channel lock has finished.
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.tx.send_if_modified(|_| false);
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
