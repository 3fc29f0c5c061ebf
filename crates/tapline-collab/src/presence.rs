//! Presence awareness
//!
//! Each logged-in view announces itself on the sync bus every
//! [`PING_INTERVAL`]. The roster deduplicates by username and expires
//! entries that stop pinging: an entry is dropped once no ping has been
//! seen for twice the ping interval.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tapline_domain::User;

/// How often a logged-in view announces its presence.
pub const PING_INTERVAL: Duration = Duration::from_secs(5);

/// A ping missing for this long marks the view as gone.
pub fn liveness_timeout() -> chrono::Duration {
    chrono::Duration::seconds(2 * PING_INTERVAL.as_secs() as i64)
}

/// One currently-seen user.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceEntry {
    pub user: User,
    pub last_seen: DateTime<Utc>,
}

/// De-duplicated set of users currently known to have an active view,
/// keyed by username. Used only for display.
#[derive(Debug, Default)]
pub struct PresenceRoster {
    entries: Vec<PresenceEntry>,
}

impl PresenceRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ping. A known username refreshes its last-seen time;
    /// a new one joins the roster.
    pub fn observe(&mut self, user: User, now: DateTime<Utc>) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.user.username == user.username)
        {
            Some(entry) => {
                entry.user = user;
                entry.last_seen = now;
            }
            None => self.entries.push(PresenceEntry {
                user,
                last_seen: now,
            }),
        }
    }

    /// Drop entries whose last ping is older than the liveness timeout.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let timeout = liveness_timeout();
        self.entries.retain(|e| now - e.last_seen <= timeout);
    }

    pub fn online_users(&self) -> Vec<&User> {
        self.entries.iter().map(|e| &e.user).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapline_domain::Role;

    #[test]
    fn pings_deduplicate_by_username() {
        let mut roster = PresenceRoster::new();
        let now = Utc::now();
        roster.observe(User::new("alice", Role::Engineer), now);
        roster.observe(User::new("bob", Role::Surveyor), now);
        roster.observe(User::new("alice", Role::Engineer), now);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn reping_refreshes_last_seen() {
        let mut roster = PresenceRoster::new();
        let earlier = Utc::now() - chrono::Duration::seconds(30);
        roster.observe(User::new("alice", Role::Engineer), earlier);

        let now = Utc::now();
        roster.observe(User::new("alice", Role::Engineer), now);
        roster.prune(now);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn prune_drops_stale_entries() {
        let mut roster = PresenceRoster::new();
        let now = Utc::now();
        roster.observe(
            User::new("gone", Role::Surveyor),
            now - chrono::Duration::seconds(11),
        );
        roster.observe(
            User::new("fresh", Role::Engineer),
            now - chrono::Duration::seconds(9),
        );

        roster.prune(now);
        let names: Vec<_> = roster.online_users().iter().map(|u| &u.username).collect();
        assert_eq!(names, ["fresh"]);
    }

    #[test]
    fn entry_exactly_at_timeout_survives() {
        let mut roster = PresenceRoster::new();
        let now = Utc::now();
        roster.observe(User::new("edge", Role::Admin), now - liveness_timeout());
        roster.prune(now);
        assert_eq!(roster.len(), 1);
    }
}
