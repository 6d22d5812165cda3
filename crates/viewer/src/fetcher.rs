//! User record fetcher.
//!
//! Drives bootstrap -> fetch -> classify for one identifier at a time and
//! publishes the resulting [`FetchState`] on a watch channel.
//!
//! Each call to [`RecordFetcher::load`] takes a fresh generation number. When
//! a lookup settles, its state is published only if no newer lookup has
//! started in the meantime, so a slow response for an old identifier can
//! never overwrite the state of the current one.

use std::sync::atomic::{AtomicU64, Ordering};

use bizcard_core::{FailureReason, FetchState, RecordId, UserRecord};
use tokio::sync::watch;
use tracing::instrument;

use crate::config::FirebaseConfig;
use crate::error::{AppError, add_breadcrumb};
use crate::firebase::{
    AnonymousAuthClient, FirestoreClient, IdentityProvider, RecordStore, StoreError,
    USERS_COLLECTION, ensure_identity,
};

/// Fetcher wired to the Firebase REST clients.
pub type FirebaseFetcher = RecordFetcher<FirestoreClient, AnonymousAuthClient>;

/// Fetches profile records and tracks their lifecycle.
pub struct RecordFetcher<S, I> {
    store: S,
    identity: I,
    generation: AtomicU64,
    state: watch::Sender<FetchState>,
}

impl<S, I> RecordFetcher<S, I>
where
    S: RecordStore,
    I: IdentityProvider,
{
    /// Create a fetcher. The initial state is `Loading`.
    #[must_use]
    pub fn new(store: S, identity: I) -> Self {
        let (state, _) = watch::channel(FetchState::Loading);
        Self {
            store,
            identity,
            generation: AtomicU64::new(0),
            state,
        }
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Snapshot of the latest published state.
    #[must_use]
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Look up the record for `id` and return how this lookup settled.
    ///
    /// - no identifier: settles to `Failed(MissingIdentifier)` immediately,
    ///   without passing through `Loading` or touching the store
    /// - document exists: `Ready`
    /// - document absent: `NotFound`
    /// - anything else (invalid id, network, permission, decoding):
    ///   `Failed(LoadFailure)`
    ///
    /// The returned value is always this lookup's own outcome; the published
    /// state only changes if this is still the latest lookup.
    #[instrument(skip(self))]
    pub async fn load(&self, id: Option<&str>) -> FetchState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(id) = id.filter(|id| !id.is_empty()) else {
            tracing::warn!("No record identifier provided");
            let state = FetchState::Failed(FailureReason::MissingIdentifier);
            self.publish(generation, state.clone());
            return state;
        };

        self.publish(generation, FetchState::Loading);

        ensure_identity(&self.identity).await;

        let state = match self.fetch(id).await {
            Ok(Some(record)) => FetchState::Ready(record),
            Ok(None) => {
                tracing::info!(id, "Record not found");
                FetchState::NotFound
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Failed to load record");
                add_breadcrumb("fetch", "Record load failed", Some(&[("id", id)]));
                FetchState::Failed(FailureReason::LoadFailure)
            }
        };

        if !self.publish(generation, state.clone()) {
            tracing::debug!(id, generation, "Discarding superseded lookup result");
        }
        state
    }

    async fn fetch(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        let id = RecordId::parse(id)?;
        self.store.get_record(USERS_COLLECTION, &id).await
    }

    /// Publish `state` if `generation` is still the latest lookup.
    ///
    /// The check runs under the channel's write lock, so a newer lookup
    /// cannot publish between the check and the send.
    fn publish(&self, generation: u64, state: FetchState) -> bool {
        self.state.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = state;
            true
        })
    }
}

impl FirebaseFetcher {
    /// Build the identity and store clients for `config`, sharing one
    /// session between them.
    ///
    /// # Errors
    ///
    /// Returns error if either HTTP client fails to build.
    pub fn connect(config: &FirebaseConfig) -> Result<Self, AppError> {
        let identity = AnonymousAuthClient::new(config)?;
        let store = FirestoreClient::new(config, identity.clone())?;
        Ok(Self::new(store, identity))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use tokio::sync::{Mutex, oneshot};

    use super::*;
    use crate::firebase::{IdentityError, IdentitySession};

    /// Store double backed by a map, counting calls.
    #[derive(Default)]
    struct MapStore {
        records: HashMap<String, UserRecord>,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecordStore for MapStore {
        async fn get_record(
            &self,
            collection: &str,
            id: &RecordId,
        ) -> Result<Option<UserRecord>, StoreError> {
            assert_eq!(collection, USERS_COLLECTION);
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::PermissionDenied("no credential".to_string()));
            }
            Ok(self.records.get(id.as_str()).cloned())
        }
    }

    /// Identity double that always fails to sign in.
    struct NoIdentity;

    #[async_trait]
    impl IdentityProvider for NoIdentity {
        async fn current_session(&self) -> Option<IdentitySession> {
            None
        }

        async fn sign_in_anonymously(&self) -> Result<IdentitySession, IdentityError> {
            Err(IdentityError::Parse("offline".to_string()))
        }
    }

    fn pedro() -> UserRecord {
        UserRecord {
            given_names: Some("Pedro".to_string()),
            family_names: Some("García".to_string()),
            phone_number: Some("+51 999 888 777".to_string()),
            ..UserRecord::default()
        }
    }

    fn store_with_pedro() -> MapStore {
        MapStore {
            records: HashMap::from([("pedro".to_string(), pedro())]),
            ..MapStore::default()
        }
    }

    #[tokio::test]
    async fn test_existing_record_is_ready() {
        let fetcher = RecordFetcher::new(store_with_pedro(), NoIdentity);
        let state = fetcher.load(Some("pedro")).await;

        assert_eq!(state, FetchState::Ready(pedro()));
        assert_eq!(fetcher.state(), state);
        assert_eq!(state.error_reason(), None);
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let fetcher = RecordFetcher::new(store_with_pedro(), NoIdentity);
        let state = fetcher.load(Some("nobody")).await;

        assert_eq!(state, FetchState::NotFound);
        assert_eq!(state.error_reason(), Some("not found"));
    }

    #[tokio::test]
    async fn test_missing_identifier_never_calls_store() {
        let fetcher = RecordFetcher::new(store_with_pedro(), NoIdentity);
        let mut rx = fetcher.subscribe();
        rx.borrow_and_update();

        let state = fetcher.load(None).await;
        assert_eq!(state, FetchState::Failed(FailureReason::MissingIdentifier));
        assert_eq!(state.error_reason(), Some("missing identifier"));

        // Published straight to the failure, no loading flicker
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), state);

        let state = fetcher.load(Some("")).await;
        assert_eq!(state, FetchState::Failed(FailureReason::MissingIdentifier));
        assert_eq!(fetcher.store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_error_is_load_failure_not_not_found() {
        let store = MapStore {
            fail: true,
            ..store_with_pedro()
        };
        let fetcher = RecordFetcher::new(store, NoIdentity);

        let state = fetcher.load(Some("pedro")).await;
        assert_eq!(state, FetchState::Failed(FailureReason::LoadFailure));
        assert_eq!(state.error_reason(), Some("load failure"));
    }

    #[tokio::test]
    async fn test_invalid_identifier_is_load_failure() {
        let fetcher = RecordFetcher::new(store_with_pedro(), NoIdentity);
        let state = fetcher.load(Some("users/pedro")).await;

        assert_eq!(state, FetchState::Failed(FailureReason::LoadFailure));
        assert_eq!(fetcher.store.calls.load(Ordering::SeqCst), 0);
    }

    /// Store double whose responses are released by the test.
    struct GatedStore {
        gates: Mutex<HashMap<String, oneshot::Receiver<Option<UserRecord>>>>,
    }

    #[async_trait]
    impl RecordStore for GatedStore {
        async fn get_record(
            &self,
            _collection: &str,
            id: &RecordId,
        ) -> Result<Option<UserRecord>, StoreError> {
            let gate = self.gates.lock().await.remove(id.as_str()).unwrap();
            Ok(gate.await.unwrap())
        }
    }

    #[tokio::test]
    async fn test_stale_response_does_not_overwrite_newer_state() {
        let (old_tx, old_rx) = oneshot::channel();
        let (new_tx, new_rx) = oneshot::channel();
        let store = GatedStore {
            gates: Mutex::new(HashMap::from([
                ("old".to_string(), old_rx),
                ("new".to_string(), new_rx),
            ])),
        };
        let fetcher = Arc::new(RecordFetcher::new(store, NoIdentity));

        let first = tokio::spawn({
            let fetcher = Arc::clone(&fetcher);
            async move { fetcher.load(Some("old")).await }
        });
        // Let the first lookup reach the store before starting the second
        tokio::task::yield_now().await;
        while fetcher.store.gates.lock().await.contains_key("old") {
            tokio::task::yield_now().await;
        }

        let second = tokio::spawn({
            let fetcher = Arc::clone(&fetcher);
            async move { fetcher.load(Some("new")).await }
        });
        while fetcher.store.gates.lock().await.contains_key("new") {
            tokio::task::yield_now().await;
        }

        // Newer lookup settles first, older one afterwards
        new_tx.send(Some(pedro())).unwrap();
        assert_eq!(second.await.unwrap(), FetchState::Ready(pedro()));

        old_tx.send(None).unwrap();
        assert_eq!(first.await.unwrap(), FetchState::NotFound);

        assert_eq!(fetcher.state(), FetchState::Ready(pedro()));
    }

    #[tokio::test]
    async fn test_superseded_lookup_leaves_loading_in_place() {
        let (old_tx, old_rx) = oneshot::channel();
        let (new_tx, new_rx) = oneshot::channel();
        let store = GatedStore {
            gates: Mutex::new(HashMap::from([
                ("old".to_string(), old_rx),
                ("new".to_string(), new_rx),
            ])),
        };
        let fetcher = Arc::new(RecordFetcher::new(store, NoIdentity));
        let mut rx = fetcher.subscribe();

        let first = tokio::spawn({
            let fetcher = Arc::clone(&fetcher);
            async move { fetcher.load(Some("old")).await }
        });
        while fetcher.store.gates.lock().await.contains_key("old") {
            tokio::task::yield_now().await;
        }
        let second = tokio::spawn({
            let fetcher = Arc::clone(&fetcher);
            async move { fetcher.load(Some("new")).await }
        });
        while fetcher.store.gates.lock().await.contains_key("new") {
            tokio::task::yield_now().await;
        }
        rx.borrow_and_update();

        // Older lookup settles while the newer one is still in flight
        old_tx.send(None).unwrap();
        assert_eq!(first.await.unwrap(), FetchState::NotFound);
        assert!(!rx.has_changed().unwrap());
        assert!(fetcher.state().is_loading());

        new_tx.send(Some(pedro())).unwrap();
        assert_eq!(second.await.unwrap(), FetchState::Ready(pedro()));
        assert_eq!(*rx.borrow_and_update(), FetchState::Ready(pedro()));
    }

    #[test]
    fn test_stale_generation_is_not_published() {
        let fetcher = RecordFetcher::new(store_with_pedro(), NoIdentity);
        fetcher.generation.store(2, Ordering::SeqCst);

        assert!(!fetcher.publish(1, FetchState::NotFound));
        assert!(fetcher.state().is_loading());

        assert!(fetcher.publish(2, FetchState::NotFound));
        assert_eq!(fetcher.state(), FetchState::NotFound);
    }
}
