//! Per-Session Permission Cache
//!
//! Holds one resolved [`PermissionGate`] per authenticated session using
//! `DashMap` for lock-free concurrent access. Sets are resolved on first
//! use, kept until the session's token expires, and dropped on logout or
//! when the underlying role data changes.
//!
//! Every cached entry carries a ticket drawn from a generation counter.
//! A resolution only writes back into the entry it started from, so a
//! result that finishes after an invalidation is discarded and resolved
//! again instead of being cached or handed out.
//!
//! Logged-out sessions leave a tombstone until their token expires: a
//! resolution still in flight at logout is dropped, and the session id
//! is never filled again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use grc_common::{EffectivePermissionSet, PermissionGate, Role};
use tracing::{debug, warn};
use uuid::Uuid;

use super::resolver::{Outcome, PermissionResolver};
use super::store::{PermissionStore, RoleStore};

/// Resolutions discarded as stale before a call gives up and denies.
const MAX_STALE_ROUNDS: usize = 3;

/// Observable state of a session's permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionState {
    Loading,
    Ready(Arc<EffectivePermissionSet>),
    /// Resolution failed; the session is served the denied gate until a retry succeeds.
    Failed,
}

enum EntryState {
    Loading,
    Ready(PermissionGate),
    Failed,
}

struct SessionEntry {
    ticket: u64,
    user_id: Uuid,
    role: Option<Role>,
    expires_at: DateTime<Utc>,
    state: EntryState,
}

/// Thread-safe cache of resolved permissions keyed by session.
pub struct SessionPermissions<R, P> {
    resolver: PermissionResolver<R, P>,
    sessions: DashMap<Uuid, SessionEntry>,
    /// Logged-out sessions and the expiry of their token.
    ended: DashMap<Uuid, DateTime<Utc>>,
    next_ticket: AtomicU64,
}

impl<R: RoleStore, P: PermissionStore> SessionPermissions<R, P> {
    pub fn new(resolver: PermissionResolver<R, P>) -> Self {
        Self {
            resolver,
            sessions: DashMap::new(),
            ended: DashMap::new(),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub const fn resolver(&self) -> &PermissionResolver<R, P> {
        &self.resolver
    }

    fn loading(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> SessionEntry {
        SessionEntry {
            ticket: self.next_ticket.fetch_add(1, Ordering::Relaxed),
            user_id,
            role: None,
            expires_at,
            state: EntryState::Loading,
        }
    }

    /// Get the gate for a session, resolving it if not cached.
    ///
    /// Any failure yields the denied gate.
    pub async fn gate(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PermissionGate {
        self.resolve(session_id, user_id, expires_at)
            .await
            .unwrap_or_else(PermissionGate::denied)
    }

    /// Resolve a session's gate, `None` if resolution failed.
    ///
    /// A session that was resolved for a different user is discarded and
    /// resolved again. Failures are never cached as a grant: the next call
    /// retries. A logged-out session is always `None`.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Option<PermissionGate> {
        let known = match self.sessions.get(&session_id) {
            Some(entry) => {
                if let (true, EntryState::Ready(gate)) = (entry.user_id == user_id, &entry.state) {
                    return Some(gate.clone());
                }
                true
            }
            None => false,
        };
        if !known {
            self.evict_expired(Utc::now());
        }

        for round in 0..MAX_STALE_ROUNDS {
            if self.ended.contains_key(&session_id) {
                debug!(%session_id, "Session already logged out");
                return None;
            }

            let ticket = match self.sessions.entry(session_id) {
                Entry::Occupied(mut occupied) => {
                    let entry = occupied.get_mut();
                    if entry.user_id != user_id {
                        debug!(%session_id, "Session user changed; discarding cached permissions");
                        *entry = self.loading(user_id, expires_at);
                    } else if let EntryState::Ready(gate) = &entry.state {
                        return Some(gate.clone());
                    } else {
                        entry.state = EntryState::Loading;
                    }
                    entry.ticket
                }
                Entry::Vacant(vacant) => vacant.insert(self.loading(user_id, expires_at)).ticket,
            };

            let outcome = self.resolver.resolve_or_deny(user_id).await;

            if self.ended.contains_key(&session_id) {
                self.sessions.remove_if(&session_id, |_, entry| entry.ticket == ticket);
                debug!(%session_id, "Session logged out during resolution; discarding");
                return None;
            }

            let Some(mut entry) = self.sessions.get_mut(&session_id) else {
                debug!(%session_id, round, "Session invalidated during resolution; restarting");
                continue;
            };
            if entry.ticket != ticket {
                drop(entry);
                debug!(%session_id, round, "Stale resolution discarded; restarting");
                continue;
            }

            if outcome == Outcome::Failed {
                entry.role = None;
                entry.state = EntryState::Failed;
                return None;
            }

            let gate = outcome.into_gate();
            entry.role = gate.role();
            entry.state = EntryState::Ready(gate.clone());
            return Some(gate);
        }

        warn!(%session_id, %user_id, "Permissions kept changing during resolution; denying");
        None
    }

    /// Current state of a session, `None` if nothing is cached.
    pub fn state(&self, session_id: Uuid) -> Option<ResolutionState> {
        self.sessions.get(&session_id).map(|entry| match &entry.state {
            EntryState::Loading => ResolutionState::Loading,
            EntryState::Ready(gate) => ResolutionState::Ready(Arc::clone(gate.permissions())),
            EntryState::Failed => ResolutionState::Failed,
        })
    }

    /// Drop a session's permissions (logout).
    ///
    /// The session id stays blocked until `expires_at`, after which its
    /// token is no longer accepted anyway.
    pub fn end_session(&self, session_id: Uuid, expires_at: DateTime<Utc>) {
        self.ended.insert(session_id, expires_at);
        self.sessions.remove(&session_id);
    }

    /// Drop every session of a user whose role assignment changed.
    pub fn invalidate_user(&self, user_id: Uuid) {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.user_id != user_id);
        Self::log_invalidated(before.saturating_sub(self.sessions.len()));
    }

    /// Drop every session resolved for a role whose permission rows changed.
    ///
    /// Sessions still loading are dropped too, since they may be reading
    /// the old rows.
    pub fn invalidate_role(&self, role: Role) {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| {
            entry.role != Some(role) && !matches!(entry.state, EntryState::Loading)
        });
        Self::log_invalidated(before.saturating_sub(self.sessions.len()));
    }

    fn log_invalidated(count: usize) {
        if count > 0 {
            debug!(count, "Invalidated cached permissions");
        }
    }

    /// Remove sessions and logout tombstones whose token expired at or
    /// before `now`. Returns the number of cached sessions removed.
    pub fn evict_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.expires_at > now);
        self.ended.retain(|_, expires_at| *expires_at > now);

        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            debug!(evicted, "Evicted expired session permissions");
        }
        evicted
    }

    /// Number of sessions with cached state.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
