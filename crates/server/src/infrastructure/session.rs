//! In-process session store.
//!
//! Sessions are opaque UUID tokens held in a concurrent map; restarting the
//! server logs everyone out, which is acceptable for this deployment.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use pharmstock_domain::{PharmacyId, Role, SessionToken, User, UserId};

pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    pub pharmacy_id: Option<PharmacyId>,
    pub expires_at: DateTime<Utc>,
}

pub struct SessionStore {
    sessions: DashMap<SessionToken, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn create(&self, user: &User, now: DateTime<Utc>) -> SessionToken {
        let token = SessionToken::new();
        self.sessions.insert(
            token,
            Session {
                user_id: user.id,
                username: user.username.clone(),
                role: user.role,
                pharmacy_id: user.pharmacy_id,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    /// Look up a session; expired entries are removed on access.
    pub fn resolve(&self, token: SessionToken, now: DateTime<Utc>) -> Option<Session> {
        let session = self.sessions.get(&token)?.clone();
        if session.expires_at <= now {
            self.sessions.remove(&token);
            return None;
        }
        Some(session)
    }

    pub fn revoke(&self, token: SessionToken) {
        self.sessions.remove(&token);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pharmacy_user() -> User {
        User::pending_pharmacy("owner@acme.lk", PharmacyId::new())
    }

    #[test]
    fn create_and_resolve() {
        let store = SessionStore::default();
        let user = pharmacy_user();
        let now = Utc::now();
        let token = store.create(&user, now);

        let session = store.resolve(token, now).expect("live session");
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.pharmacy_id, user.pharmacy_id);
    }

    #[test]
    fn expired_sessions_disappear() {
        let store = SessionStore::new(1);
        let now = Utc::now();
        let token = store.create(&pharmacy_user(), now);
        assert!(store.resolve(token, now + Duration::hours(2)).is_none());
        // Gone for good, even at an earlier timestamp.
        assert!(store.resolve(token, now).is_none());
    }

    #[test]
    fn revoke_removes_session() {
        let store = SessionStore::default();
        let now = Utc::now();
        let token = store.create(&pharmacy_user(), now);
        store.revoke(token);
        assert!(store.resolve(token, now).is_none());
    }

    #[test]
    fn unknown_token_is_none() {
        let store = SessionStore::default();
        assert!(store.resolve(SessionToken::new(), Utc::now()).is_none());
    }
}
