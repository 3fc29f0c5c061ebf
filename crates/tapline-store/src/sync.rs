//! State synchronizer
//!
//! Keeps a view's store, its durable cache, the other views, and the
//! remote backend eventually consistent. Broadcasts and the backend are
//! independent paths with no shared transaction; the backend is
//! last-write-wins by design.

use std::sync::Arc;

use chrono::Utc;
use tapline_collab::{SessionContext, SessionError, SyncBus};
use tapline_domain::User;
use tracing::{debug, info};

use crate::cache::LocalCache;
use crate::shared_state::SharedState;
use crate::store::RecordStore;

/// Result of an explicit save, surfaced to the user synchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Failed { reason: String },
}

impl SaveOutcome {
    /// Notification text for a blocking alert-style dialog.
    pub fn message(&self) -> String {
        match self {
            SaveOutcome::Saved => "Workspace saved to shared backend.".to_string(),
            SaveOutcome::Failed { reason } => format!("Save failed: {reason}"),
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

pub struct Synchronizer<C: LocalCache> {
    store: RecordStore,
    cache: C,
    session: SessionContext,
}

impl<C: LocalCache> Synchronizer<C> {
    pub fn new(cache: C, bus: Arc<dyn SyncBus>) -> Self {
        Self {
            store: RecordStore::new(),
            cache,
            session: SessionContext::new(bus),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Mutable access for CRUD operations; call [`broadcast_update`]
    /// afterwards so the cache and the other views see the change.
    ///
    /// [`broadcast_update`]: Synchronizer::broadcast_update
    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Establish a session and load the durable cache into the store.
    pub fn login(&mut self, user: User) -> Result<(), SessionError> {
        self.session.login(user.clone())?;
        if let Err(err) = self.cache.store_session(&user) {
            debug!(error = %err, "failed to persist session");
        }
        let state = SharedState::new(self.cache.load_records(), self.cache.load_activities());
        self.store.replace_all(state);
        Ok(())
    }

    /// The session persisted by a previous login, if any.
    pub fn restore_session(&self) -> Option<User> {
        self.cache.load_session()
    }

    /// Apply the outcome of the login-time backend fetch. A well-formed
    /// payload wholesale-replaces local state and refreshes the cache;
    /// anything else keeps the cache-loaded state with only a diagnostic
    /// log. Ends in `Ready` either way.
    pub fn finish_login_sync(
        &mut self,
        fetched: Option<SharedState>,
    ) -> Result<(), SessionError> {
        match fetched {
            Some(state) => {
                info!(
                    records = state.records.len(),
                    "adopting shared state from backend"
                );
                if let Err(err) = self.cache.store_state(&state) {
                    debug!(error = %err, "failed to refresh cache from backend state");
                }
                self.store.replace_all(state);
            }
            None => debug!("no shared data from backend, keeping cached state"),
        }
        self.session.ready()
    }

    /// Persist both collections and announce them to the other views.
    /// Call after every local mutation.
    pub fn broadcast_update(&mut self) -> Result<(), SessionError> {
        let state = self.store.to_state();
        if let Err(err) = self.cache.store_state(&state) {
            debug!(error = %err, "failed to mirror state to cache");
        }
        self.session
            .broadcast(state.records, state.activities, Utc::now())
    }

    /// Drain the bus: data updates replace the collections wholesale
    /// (last writer wins), presence pings feed the roster. Returns how
    /// many updates were applied.
    pub fn poll(&mut self) -> usize {
        let updates = self.session.poll(Utc::now());
        let applied = updates.len();
        if let Some(update) = updates.into_iter().last() {
            self.store
                .replace_all(SharedState::new(update.records, update.activities));
        }
        applied
    }

    /// Periodic presence announcement.
    pub fn ping(&self) -> Result<(), SessionError> {
        self.session.ping()
    }

    /// Tear down the session. The in-memory collections survive until the
    /// next login reloads them.
    pub fn logout(&mut self) {
        self.session.logout();
        if let Err(err) = self.cache.clear_session() {
            debug!(error = %err, "failed to clear persisted session");
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.session.is_syncing(Utc::now())
    }
}

#[cfg(feature = "native")]
impl<C: LocalCache> Synchronizer<C> {
    /// Login-time backend sync: fetch the shared document and adopt it if
    /// well-formed; otherwise keep the cache-loaded state. Never surfaces
    /// an error to the user.
    pub async fn sync_from_backend(
        &mut self,
        client: &crate::remote::RemoteClient,
    ) -> Result<(), SessionError> {
        self.session.begin_backend_sync()?;
        let fetched = match client.fetch().await {
            Ok(state) => state,
            Err(err) => {
                debug!(error = %err, "backend fetch failed, keeping local state");
                None
            }
        };
        self.finish_login_sync(fetched)
    }

    /// User-triggered save of the current state to the backend. The
    /// outcome is reported synchronously; there is no retry or queuing.
    pub async fn save_to_backend(&self, client: &crate::remote::RemoteClient) -> SaveOutcome {
        match client.save(&self.store.to_state()).await {
            Ok(()) => SaveOutcome::Saved,
            Err(err) => SaveOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::JsonFileCache;
    use tapline_collab::LocalBus;
    use tapline_domain::Role;

    fn synchronizer(dir: &std::path::Path, bus: &Arc<LocalBus>) -> Synchronizer<JsonFileCache> {
        Synchronizer::new(JsonFileCache::new(dir), bus.clone())
    }

    fn engineer() -> User {
        User::new("alice", Role::Engineer)
    }

    #[test]
    fn login_loads_cached_state() {
        let dir = tempfile::tempdir().unwrap();
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());

        // First session writes some state.
        let mut sync = synchronizer(dir.path(), &bus);
        sync.login(engineer()).unwrap();
        sync.finish_login_sync(None).unwrap();
        sync.store_mut().create("List 1", &engineer());
        sync.broadcast_update().unwrap();
        sync.logout();

        // A fresh session over the same cache sees the record.
        let mut next = synchronizer(dir.path(), &bus);
        assert!(next.restore_session().is_none());
        next.login(engineer()).unwrap();
        assert_eq!(next.store().records().len(), 1);
    }

    #[test]
    fn empty_backend_payload_keeps_cached_state() {
        let dir = tempfile::tempdir().unwrap();
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());
        let mut sync = synchronizer(dir.path(), &bus);
        sync.login(engineer()).unwrap();
        sync.finish_login_sync(None).unwrap();
        sync.store_mut().create("List 1", &engineer());
        sync.broadcast_update().unwrap();
        sync.logout();

        let mut next = synchronizer(dir.path(), &bus);
        next.login(engineer()).unwrap();
        // Backend returned `{}`: treated as no shared data yet.
        next.finish_login_sync(None).unwrap();
        assert_eq!(next.store().records().len(), 1);
    }

    #[test]
    fn backend_payload_replaces_state_and_cache() {
        let dir = tempfile::tempdir().unwrap();
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());
        let mut sync = synchronizer(dir.path(), &bus);
        sync.login(engineer()).unwrap();

        let mut shared = RecordStore::new();
        shared.create("Shared List", &engineer());
        sync.finish_login_sync(Some(shared.to_state())).unwrap();

        assert_eq!(sync.store().records()[0].list_no, "Shared List");
        // Cache was refreshed: a new session sees the backend state.
        sync.logout();
        let mut next = synchronizer(dir.path(), &bus);
        next.login(engineer()).unwrap();
        assert_eq!(next.store().records()[0].list_no, "Shared List");
    }

    #[test]
    fn mutation_in_one_view_reaches_the_other() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());

        let mut view_a = synchronizer(dir_a.path(), &bus);
        let mut view_b = synchronizer(dir_b.path(), &bus);
        for view in [&mut view_a, &mut view_b] {
            view.login(engineer()).unwrap();
            view.finish_login_sync(None).unwrap();
        }

        view_a.store_mut().create("List 1", &engineer());
        view_a.broadcast_update().unwrap();

        assert_eq!(view_b.poll(), 1);
        assert_eq!(view_b.store().records().len(), 1);
        assert_eq!(view_b.store().activities()[0].user, "alice");
        assert!(view_b.is_syncing());
    }

    #[test]
    fn last_update_wins_when_polling_a_backlog() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());

        let mut view_a = synchronizer(dir_a.path(), &bus);
        let mut view_b = synchronizer(dir_b.path(), &bus);
        for view in [&mut view_a, &mut view_b] {
            view.login(engineer()).unwrap();
            view.finish_login_sync(None).unwrap();
        }

        view_a.store_mut().create("List 1", &engineer());
        view_a.broadcast_update().unwrap();
        view_a.store_mut().create("List 2", &engineer());
        view_a.broadcast_update().unwrap();

        assert_eq!(view_b.poll(), 2);
        assert_eq!(view_b.store().records().len(), 2);
        assert_eq!(view_b.store().records()[0].list_no, "List 2");
    }

    #[test]
    fn save_outcome_messages() {
        assert!(SaveOutcome::Saved.is_saved());
        let failed = SaveOutcome::Failed {
            reason: "Backend returned status 503".into(),
        };
        assert!(failed.message().contains("503"));
    }
}
