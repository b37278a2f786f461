// ── Publication store ──
//
// Owns the snapshot and runs every user intent against it. Writes are
// confirmed by the server and then followed by a full re-list; the
// snapshot is only ever replaced by a refresh result.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwapOption;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::{Mutex, broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sphere_api::{Credential, Publication, PublicationsClient};

use super::snapshot::{Apply, Snapshot, SnapshotCell};
use crate::backend::PublicationBackend;
use crate::config::StoreConfig;
use crate::error::CoreError;
use crate::expiry;
use crate::form::PublicationForm;
use crate::notification::{Intent, Notification};
use crate::search::filter_by_title;
use crate::stream::SnapshotStream;

const NOTIFICATION_CHANNEL_SIZE: usize = 64;

// ── StoreState ───────────────────────────────────────────────────

/// Where the current mutation intent is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Idle,
    /// The write call is in flight.
    Submitting,
    /// The write was confirmed; the re-list is in flight.
    Refreshing,
}

// ── PurgeReport ──────────────────────────────────────────────────

/// Result of [`PublicationStore::purge_expired`].
#[derive(Debug, Clone)]
pub struct PurgeReport {
    /// Records selected as expired.
    pub selected: Vec<Arc<Publication>>,
    /// Uuids the server confirmed as deleted.
    pub deleted: Vec<String>,
    /// Uuids whose delete failed, with the reason.
    pub failed: Vec<(String, CoreError)>,
    pub notification: Notification,
}

// ── PublicationStore ─────────────────────────────────────────────

/// Owner of the local publication snapshot.
///
/// Cheaply cloneable. Mutation intents (create, update, delete, purge)
/// queue behind a single write gate, so one intent's write and refresh
/// never interleave with another's. Every intent returns the one
/// [`Notification`] it emitted.
pub struct PublicationStore<B> {
    inner: Arc<StoreInner<B>>,
}

impl<B> Clone for PublicationStore<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StoreInner<B> {
    backend: B,
    snapshot: SnapshotCell,
    state: watch::Sender<StoreState>,
    notifications: broadcast::Sender<Notification>,
    search_term: watch::Sender<String>,
    credential: ArcSwapOption<Credential>,
    /// Serializes mutation intents.
    write_gate: Mutex<()>,
    /// Last refresh sequence number handed out.
    next_seq: AtomicU64,
    cancel: CancellationToken,
}

impl PublicationStore<PublicationsClient> {
    /// Build a store backed by the real publications service.
    ///
    /// Does not touch the network; call [`mount`](Self::mount) or
    /// [`reload`](Self::reload) to load the collection.
    pub fn connect(config: &StoreConfig) -> Result<Self, CoreError> {
        let client = PublicationsClient::new(config.api_url.as_str(), &config.transport())?;
        let store = Self::new(client);
        if let Some(credential) = &config.credential {
            store.set_credential(credential.clone());
        }
        Ok(store)
    }
}

impl<B: PublicationBackend> PublicationStore<B> {
    pub fn new(backend: B) -> Self {
        let (state, _) = watch::channel(StoreState::Idle);
        let (notifications, _) = broadcast::channel(NOTIFICATION_CHANNEL_SIZE);
        let (search_term, _) = watch::channel(String::new());

        Self {
            inner: Arc::new(StoreInner {
                backend,
                snapshot: SnapshotCell::new(),
                state,
                notifications,
                search_term,
                credential: ArcSwapOption::empty(),
                write_gate: Mutex::new(()),
                next_seq: AtomicU64::new(0),
                cancel: CancellationToken::new(),
            }),
        }
    }

    // ── Credential ───────────────────────────────────────────────

    pub fn set_credential(&self, credential: Credential) {
        self.inner.credential.store(Some(Arc::new(credential)));
    }

    /// Forget the credential. Later intents fail with `Unauthorized`
    /// until a new one is set; the snapshot is kept.
    pub fn sign_out(&self) {
        self.inner.credential.store(None);
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner.credential.load().is_some()
    }

    // ── Load intents ─────────────────────────────────────────────

    /// Store the credential and load the collection from scratch.
    pub async fn mount(&self, credential: Credential) -> Notification {
        self.set_credential(credential);
        self.reload().await
    }

    /// Re-fetch the collection with the stored credential.
    ///
    /// Does not take the write gate; overlapping reloads are ordered by
    /// their sequence numbers instead.
    pub async fn reload(&self) -> Notification {
        let credential = match self.ready() {
            Ok(credential) => credential,
            Err(e) => return self.emit(Notification::failure(Intent::Load, &e)),
        };

        match self.refresh(&credential).await {
            Ok(()) => {
                let count = self.inner.snapshot.current().len();
                self.emit(Notification::success_with(
                    Intent::Load,
                    format!("{count} publications loaded"),
                ))
            }
            Err(e) => self.emit(Notification::failure(Intent::Load, &e)),
        }
    }

    // ── Mutation intents ─────────────────────────────────────────

    /// Validate `form`, create the record, then re-list.
    pub async fn create(&self, form: &PublicationForm) -> Notification {
        let intent = Intent::Create;
        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => return self.emit(Notification::failure(intent, &e)),
        };
        let credential = match self.ready() {
            Ok(credential) => credential,
            Err(e) => return self.emit(Notification::failure(intent, &e)),
        };

        let _gate = self.inner.write_gate.lock().await;
        self.set_state(StoreState::Submitting);

        match self
            .guarded(self.inner.backend.create(&input, &credential), None)
            .await
        {
            Ok(created) => {
                debug!(uuid = %created.uuid, "publication created");
                self.finish_write(intent, &credential).await
            }
            Err(e) => {
                self.set_state(StoreState::Idle);
                self.emit(Notification::failure(intent, &e))
            }
        }
    }

    /// Replace the record at `uuid` with the form's values.
    ///
    /// `uuid` must be in the current snapshot; otherwise the intent fails
    /// locally with `NotFound` and nothing is sent.
    pub async fn update(&self, uuid: &str, form: &PublicationForm) -> Notification {
        let intent = Intent::Update;
        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => return self.emit(Notification::failure(intent, &e)),
        };
        let credential = match self.ready() {
            Ok(credential) => credential,
            Err(e) => return self.emit(Notification::failure(intent, &e)),
        };

        let _gate = self.inner.write_gate.lock().await;
        let existing = match self.require(uuid) {
            Ok(existing) => existing,
            Err(e) => return self.emit(Notification::failure(intent, &e)),
        };
        let record = Publication::from_input(existing.id, uuid, input);
        self.set_state(StoreState::Submitting);

        match self
            .guarded(
                self.inner.backend.update(uuid, &record, &credential),
                Some(uuid),
            )
            .await
        {
            Ok(_) => {
                debug!(uuid, "publication updated");
                self.finish_write(intent, &credential).await
            }
            Err(e) => {
                self.set_state(StoreState::Idle);
                self.emit(Notification::failure(intent, &e))
            }
        }
    }

    /// Delete the record at `uuid`, then re-list.
    ///
    /// A uuid missing from the snapshot fails locally. A 404 from the server
    /// is reported as `NotFound`, after a re-list that drops the record.
    pub async fn delete(&self, uuid: &str) -> Notification {
        let intent = Intent::Delete;
        let credential = match self.ready() {
            Ok(credential) => credential,
            Err(e) => return self.emit(Notification::failure(intent, &e)),
        };

        let _gate = self.inner.write_gate.lock().await;
        if let Err(e) = self.require(uuid) {
            return self.emit(Notification::failure(intent, &e));
        }
        self.set_state(StoreState::Submitting);

        match self
            .guarded(self.inner.backend.delete(uuid, &credential), Some(uuid))
            .await
        {
            Ok(()) => {
                debug!(uuid, "publication deleted");
                self.finish_write(intent, &credential).await
            }
            Err(e @ CoreError::NotFound { .. }) => {
                // Already gone server-side: re-list so it drops out of the snapshot.
                self.set_state(StoreState::Refreshing);
                if let Err(refresh_err) = self.refresh(&credential).await {
                    debug!(uuid, error = %refresh_err, "refresh after 404 failed");
                }
                self.set_state(StoreState::Idle);
                self.emit(Notification::failure(intent, &e))
            }
            Err(e) => {
                self.set_state(StoreState::Idle);
                self.emit(Notification::failure(intent, &e))
            }
        }
    }

    /// Delete every record whose conference date is before `today`.
    ///
    /// Deletes run one at a time; a failed delete is recorded and the rest
    /// still run. One refresh follows if anything was deleted.
    pub async fn purge_expired(&self, today: NaiveDate) -> PurgeReport {
        let intent = Intent::PurgeExpired;
        let credential = match self.ready() {
            Ok(credential) => credential,
            Err(e) => return Self::empty_report(self.emit(Notification::failure(intent, &e))),
        };

        let _gate = self.inner.write_gate.lock().await;
        let selected = self.expired(today);
        if selected.is_empty() {
            return Self::empty_report(self.emit(Notification::success_with(
                intent,
                "No expired publications",
            )));
        }

        self.set_state(StoreState::Submitting);
        let mut deleted = Vec::new();
        let mut failed = Vec::new();
        for publication in &selected {
            let uuid = publication.uuid.as_str();
            match self
                .guarded(self.inner.backend.delete(uuid, &credential), Some(uuid))
                .await
            {
                Ok(()) => deleted.push(uuid.to_owned()),
                Err(CoreError::StoreClosed) => {
                    failed.push((uuid.to_owned(), CoreError::StoreClosed));
                    break;
                }
                Err(e) => {
                    warn!(uuid, error = %e, "expired publication not deleted");
                    failed.push((uuid.to_owned(), e));
                }
            }
        }

        let any_gone = failed
            .iter()
            .any(|(_, e)| matches!(e, CoreError::NotFound { .. }));

        let notification = if deleted.is_empty() {
            if any_gone {
                self.set_state(StoreState::Refreshing);
                if let Err(e) = self.refresh(&credential).await {
                    debug!(error = %e, "refresh after purge 404s failed");
                }
            }
            self.set_state(StoreState::Idle);
            purge_failure(&failed, selected.len())
        } else {
            self.set_state(StoreState::Refreshing);
            let refreshed = self.refresh(&credential).await;
            self.set_state(StoreState::Idle);
            match refreshed {
                Err(e) => Notification::stale_view(intent, &e),
                Ok(()) if failed.is_empty() => Notification::success_with(
                    intent,
                    format!("{} expired publications removed", deleted.len()),
                ),
                Ok(()) => purge_failure(&failed, selected.len()),
            }
        };

        PurgeReport {
            selected,
            deleted,
            failed,
            notification: self.emit(notification),
        }
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Pure title filter over the current snapshot.
    pub fn search(&self, term: &str) -> Vec<Arc<Publication>> {
        filter_by_title(self.inner.snapshot.current().items(), term)
    }

    /// Remember `term` and return the filtered view for it.
    pub fn set_search(&self, term: impl Into<String>) -> Vec<Arc<Publication>> {
        self.inner.search_term.send_replace(term.into());
        self.view()
    }

    pub fn search_term(&self) -> String {
        self.inner.search_term.borrow().clone()
    }

    /// The current snapshot filtered by the stored search term.
    pub fn view(&self) -> Vec<Arc<Publication>> {
        let term = self.inner.search_term.borrow().clone();
        self.search(&term)
    }

    /// Records in the current snapshot whose conference date has passed.
    pub fn expired(&self, today: NaiveDate) -> Vec<Arc<Publication>> {
        expiry::expired(self.inner.snapshot.current().items(), today)
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.snapshot.current()
    }

    pub fn find(&self, uuid: &str) -> Option<Arc<Publication>> {
        self.inner.snapshot.current().get(uuid).cloned()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.snapshot.current().fetched_at()
    }

    // ── Observers ────────────────────────────────────────────────

    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.inner.snapshot.subscribe())
    }

    pub fn state(&self) -> StoreState {
        *self.inner.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<StoreState> {
        self.inner.state.subscribe()
    }

    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.inner.notifications.subscribe()
    }

    // ── Teardown ─────────────────────────────────────────────────

    /// Abandon in-flight calls and seal the snapshot.
    ///
    /// After this returns, no completion can change the snapshot, and every
    /// later intent fails with `StoreClosed`.
    pub fn teardown(&self) {
        self.inner.cancel.cancel();
        self.inner.snapshot.close();
        self.inner.state.send_replace(StoreState::Idle);
        info!("publication store torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.snapshot.is_closed()
    }

    // ── Private helpers ──────────────────────────────────────────

    /// The credential, if the store is open and signed in.
    fn ready(&self) -> Result<Arc<Credential>, CoreError> {
        if self.is_torn_down() {
            return Err(CoreError::StoreClosed);
        }
        self.inner
            .credential
            .load_full()
            .ok_or_else(|| CoreError::Unauthorized {
                message: "not signed in".into(),
            })
    }

    fn require(&self, uuid: &str) -> Result<Arc<Publication>, CoreError> {
        self.find(uuid).ok_or_else(|| CoreError::NotFound {
            uuid: uuid.to_owned(),
        })
    }

    /// Run a backend call unless the store is torn down first.
    async fn guarded<T>(
        &self,
        call: impl Future<Output = Result<T, sphere_api::Error>>,
        uuid: Option<&str>,
    ) -> Result<T, CoreError> {
        tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => Err(CoreError::StoreClosed),
            result = call => result.map_err(|e| CoreError::from_api(e, uuid)),
        }
    }

    /// Issue a `list()` under a fresh sequence number and apply it unless a
    /// newer refresh already landed.
    async fn refresh(&self, credential: &Credential) -> Result<(), CoreError> {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(seq, "refreshing publications");

        let items = self.guarded(self.inner.backend.list(credential), None).await?;
        let count = items.len();

        match self.inner.snapshot.replace_if_newer(seq, items) {
            Apply::Applied => {
                info!(seq, count, "snapshot replaced");
                Ok(())
            }
            Apply::Stale { current } => {
                debug!(seq, current, "discarding refresh overtaken by a newer one");
                Ok(())
            }
            Apply::Closed => Err(CoreError::StoreClosed),
        }
    }

    /// Refresh after a confirmed write and report the intent's outcome.
    async fn finish_write(&self, intent: Intent, credential: &Credential) -> Notification {
        self.set_state(StoreState::Refreshing);
        let refreshed = self.refresh(credential).await;
        self.set_state(StoreState::Idle);

        match refreshed {
            Ok(()) => self.emit(Notification::success(intent)),
            Err(e) => self.emit(Notification::stale_view(intent, &e)),
        }
    }

    fn set_state(&self, state: StoreState) {
        if !self.is_torn_down() {
            self.inner.state.send_replace(state);
        }
    }

    fn empty_report(notification: Notification) -> PurgeReport {
        PurgeReport {
            selected: Vec::new(),
            deleted: Vec::new(),
            failed: Vec::new(),
            notification,
        }
    }

    fn emit(&self, notification: Notification) -> Notification {
        if notification.is_success() {
            info!(intent = %notification.intent, "{}", notification.message);
        } else {
            warn!(
                intent = %notification.intent,
                kind = ?notification.failure,
                detail = notification.detail.as_deref().unwrap_or_default(),
                "{}",
                notification.message
            );
        }
        // No receivers is fine: the caller gets the notification back.
        let _ = self.inner.notifications.send(notification.clone());
        notification
    }
}

fn purge_failure(failed: &[(String, CoreError)], selected: usize) -> Notification {
    let mut notification = match failed.first() {
        Some((_, first)) => Notification::failure(Intent::PurgeExpired, first),
        None => Notification::failure(
            Intent::PurgeExpired,
            &CoreError::Internal("no expired publication was deleted".into()),
        ),
    };
    if let Some((_, first)) = failed.first() {
        notification.detail = Some(format!(
            "{} of {selected} deletes failed; first error: {first}",
            failed.len()
        ));
    }
    notification
}
