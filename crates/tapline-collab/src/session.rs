//! Session lifecycle
//!
//! A [`SessionContext`] owns everything tied to one logged-in view: the
//! bus subscription, the presence roster, and the transient sync
//! indicator. Nothing here is ambient or global; login and logout drive an
//! explicit state machine and tear resources down deterministically.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tapline_domain::{ActivityEntry, ConnectionRecord, User};
use thiserror::Error;

use crate::bus::{BusMessage, SyncBus};
use crate::presence::PresenceRoster;

/// How long the sync indicator stays lit after a remote update arrives.
pub const SYNC_FLASH_REMOTE: Duration = Duration::from_millis(500);
/// How long the sync indicator stays lit after a local mutation.
pub const SYNC_FLASH_LOCAL: Duration = Duration::from_millis(800);

fn flash(duration: Duration) -> chrono::Duration {
    chrono::Duration::milliseconds(duration.as_millis() as i64)
}

/// Per-view session states. Broadcast, receive, and presence pings are
/// only active in `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoadingLocalCache,
    SyncingFromBackend,
    Ready,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid session transition from {from:?}")]
    InvalidTransition { from: SessionState },
    #[error("not logged in")]
    NotLoggedIn,
}

/// A data update received from another view.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingUpdate {
    pub records: Vec<ConnectionRecord>,
    pub activities: Vec<ActivityEntry>,
}

pub struct SessionContext {
    bus: Arc<dyn SyncBus>,
    state: SessionState,
    user: Option<User>,
    receiver: Option<Receiver<BusMessage>>,
    roster: PresenceRoster,
    syncing_until: Option<DateTime<Utc>>,
}

impl SessionContext {
    pub fn new(bus: Arc<dyn SyncBus>) -> Self {
        Self {
            bus,
            state: SessionState::LoggedOut,
            user: None,
            receiver: None,
            roster: PresenceRoster::new(),
            syncing_until: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn roster(&self) -> &PresenceRoster {
        &self.roster
    }

    /// `LoggedOut -> LoadingLocalCache`. Subscribes to the bus so no
    /// broadcast sent during loading is missed.
    pub fn login(&mut self, user: User) -> Result<(), SessionError> {
        if self.state != SessionState::LoggedOut {
            return Err(SessionError::InvalidTransition { from: self.state });
        }
        self.receiver = Some(self.bus.subscribe());
        self.user = Some(user);
        self.state = SessionState::LoadingLocalCache;
        Ok(())
    }

    /// `LoadingLocalCache -> SyncingFromBackend`.
    pub fn begin_backend_sync(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::LoadingLocalCache {
            return Err(SessionError::InvalidTransition { from: self.state });
        }
        self.state = SessionState::SyncingFromBackend;
        Ok(())
    }

    /// Enter `Ready` from either loading state. The backend sync step is
    /// optional: a view may go straight from cache loading to ready.
    pub fn ready(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::LoadingLocalCache | SessionState::SyncingFromBackend => {
                self.state = SessionState::Ready;
                Ok(())
            }
            from => Err(SessionError::InvalidTransition { from }),
        }
    }

    /// Any state back to `LoggedOut`; tears down the subscription, the
    /// roster, and the sync indicator.
    pub fn logout(&mut self) {
        self.state = SessionState::LoggedOut;
        self.user = None;
        self.receiver = None;
        self.roster.clear();
        self.syncing_until = None;
    }

    /// Announce this view's identity. Call once per
    /// [`crate::presence::PING_INTERVAL`]; inactive outside `Ready`.
    pub fn ping(&self) -> Result<(), SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::InvalidTransition { from: self.state });
        }
        let user = self.user.clone().ok_or(SessionError::NotLoggedIn)?;
        self.bus.publish(BusMessage::UserPing(user));
        Ok(())
    }

    /// Announce replaced collections to the other views and light the
    /// sync indicator.
    pub fn broadcast(
        &mut self,
        records: Vec<ConnectionRecord>,
        activities: Vec<ActivityEntry>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::InvalidTransition { from: self.state });
        }
        self.bus.publish(BusMessage::DataUpdate {
            records,
            activities,
        });
        self.syncing_until = Some(now + flash(SYNC_FLASH_LOCAL));
        Ok(())
    }

    /// Drain pending bus messages. Presence pings feed the roster (which
    /// is pruned afterwards); data updates are returned for the caller to
    /// apply, newest last. Outside `Ready` nothing is consumed.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Vec<IncomingUpdate> {
        if self.state != SessionState::Ready {
            return Vec::new();
        }
        let mut updates = Vec::new();
        if let Some(receiver) = &self.receiver {
            for message in receiver.try_iter() {
                match message {
                    BusMessage::DataUpdate {
                        records,
                        activities,
                    } => {
                        updates.push(IncomingUpdate {
                            records,
                            activities,
                        });
                        self.syncing_until = Some(now + flash(SYNC_FLASH_REMOTE));
                    }
                    BusMessage::UserPing(user) => self.roster.observe(user, now),
                }
            }
        }
        self.roster.prune(now);
        updates
    }

    /// Whether the transient sync indicator is currently lit.
    pub fn is_syncing(&self, now: DateTime<Utc>) -> bool {
        self.syncing_until.is_some_and(|until| now < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::LocalBus;
    use tapline_domain::Role;

    fn ready_session(bus: &Arc<LocalBus>) -> SessionContext {
        let mut session = SessionContext::new(bus.clone());
        session.login(User::new("alice", Role::Engineer)).unwrap();
        session.ready().unwrap();
        session
    }

    #[test]
    fn login_path_reaches_ready() {
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());
        let mut session = SessionContext::new(bus);
        assert_eq!(session.state(), SessionState::LoggedOut);

        session.login(User::new("alice", Role::Admin)).unwrap();
        assert_eq!(session.state(), SessionState::LoadingLocalCache);

        session.begin_backend_sync().unwrap();
        session.ready().unwrap();
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn backend_sync_step_is_optional() {
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());
        let mut session = SessionContext::new(bus);
        session.login(User::new("alice", Role::Admin)).unwrap();
        session.ready().unwrap();
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn ready_from_logged_out_is_rejected() {
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());
        let mut session = SessionContext::new(bus);
        assert_eq!(
            session.ready(),
            Err(SessionError::InvalidTransition {
                from: SessionState::LoggedOut
            })
        );
    }

    #[test]
    fn logout_tears_down_from_any_state() {
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());
        let mut session = ready_session(&bus);
        session.logout();
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert!(session.user().is_none());
        assert!(session.roster().is_empty());
        assert!(session.ping().is_err());
    }

    #[test]
    fn broadcast_reaches_other_view_without_reload() {
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());
        let mut view_a = ready_session(&bus);
        let mut view_b = ready_session(&bus);

        let mut record = ConnectionRecord::new("List 1");
        record.reference = "HC/7".into();
        let now = Utc::now();
        view_a
            .broadcast(vec![record.clone()], Vec::new(), now)
            .unwrap();

        let updates = view_b.poll(now);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].records, vec![record]);
        assert!(view_b.is_syncing(now));
        assert!(!view_b.is_syncing(now + chrono::Duration::seconds(1)));
    }

    #[test]
    fn pings_feed_the_roster() {
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());
        let mut view_a = ready_session(&bus);
        let view_b = ready_session(&bus);

        let now = Utc::now();
        view_b.ping().unwrap();
        view_a.poll(now);
        let names: Vec<_> = view_a
            .roster()
            .online_users()
            .iter()
            .map(|u| u.username.clone())
            .collect();
        assert_eq!(names, ["alice"]);
    }

    #[test]
    fn nothing_is_consumed_before_ready() {
        let bus: Arc<LocalBus> = Arc::new(LocalBus::new());
        let mut sender = ready_session(&bus);
        let mut loading = SessionContext::new(bus.clone());
        loading.login(User::new("bob", Role::Surveyor)).unwrap();

        let now = Utc::now();
        sender.broadcast(Vec::new(), Vec::new(), now).unwrap();
        assert!(loading.poll(now).is_empty());

        // The subscription was live during loading, so the update is
        // delivered once the view becomes ready.
        loading.ready().unwrap();
        assert_eq!(loading.poll(now).len(), 1);
    }
}
