// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process cache holding at most one session token.
//!
//! Writes are keyed on a monotonic issuance ticket: a response from an older
//! issuance never replaces a newer one, and issuances started before an
//! [`SessionTokenCache::invalidate`] never repopulate the cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::token::SessionToken;

/// Ticket taken before an issuance call and presented when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IssuanceTicket(u64);

struct CacheEntry {
    token: SessionToken,
    ticket: u64,
}

#[derive(Default)]
struct CacheState {
    entry: Option<CacheEntry>,
    /// Tickets at or below this value are stale.
    floor: u64,
}

/// Single-slot token cache.
#[derive(Default)]
pub struct SessionTokenCache {
    state: Mutex<CacheState>,
    last_ticket: AtomicU64,
}

impl SessionTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached token if it may be reused for `user_id` at `now`.
    pub fn get_reusable(&self, user_id: &str, now: DateTime<Utc>) -> Option<SessionToken> {
        let state = self.state.lock().ok()?;
        state
            .entry
            .as_ref()
            .filter(|entry| entry.token.is_reusable_for(user_id, now))
            .map(|entry| entry.token.clone())
    }

    /// Cached token regardless of validity.
    pub fn peek(&self) -> Option<SessionToken> {
        let state = self.state.lock().ok()?;
        state.entry.as_ref().map(|entry| entry.token.clone())
    }

    /// Reserve a ticket for an issuance that is about to start.
    pub fn begin_issuance(&self) -> IssuanceTicket {
        IssuanceTicket(self.last_ticket.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Store the result of the issuance holding `ticket`.
    ///
    /// Returns `false` when a newer issuance or an invalidation got there
    /// first; the token is then left out of the cache.
    pub fn complete(&self, ticket: IssuanceTicket, token: SessionToken) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        if ticket.0 <= state.floor {
            return false;
        }
        state.floor = ticket.0;
        state.entry = Some(CacheEntry {
            token,
            ticket: ticket.0,
        });
        true
    }

    /// Drop the cached token and every issuance still in flight.
    pub fn invalidate(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.entry = None;
            state.floor = state.floor.max(self.last_ticket.load(Ordering::Acquire));
        }
    }

    /// Ticket of the cached token, if any.
    pub fn current_ticket(&self) -> Option<IssuanceTicket> {
        let state = self.state.lock().ok()?;
        state.entry.as_ref().map(|entry| IssuanceTicket(entry.ticket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn cache_initially_empty() {
        let cache = SessionTokenCache::new();
        assert!(cache.peek().is_none());
        assert!(cache.get_reusable("user-a", now()).is_none());
    }

    #[test]
    fn completed_issuance_is_cached() {
        let cache = SessionTokenCache::new();
        let ticket = cache.begin_issuance();
        assert!(cache.complete(ticket, SessionToken::new("user-a", "t1", None)));

        let token = cache.get_reusable("user-a", now()).unwrap();
        assert_eq!(token.bearer(), "t1");
        assert_eq!(cache.current_ticket(), Some(ticket));
    }

    #[test]
    fn older_issuance_cannot_clobber_newer() {
        let cache = SessionTokenCache::new();
        let older = cache.begin_issuance();
        let newer = cache.begin_issuance();

        assert!(cache.complete(newer, SessionToken::new("user-a", "new", None)));
        assert!(!cache.complete(older, SessionToken::new("user-a", "old", None)));

        assert_eq!(cache.peek().unwrap().bearer(), "new");
    }

    #[test]
    fn out_of_order_completion_keeps_latest_ticket() {
        let cache = SessionTokenCache::new();
        let older = cache.begin_issuance();
        let newer = cache.begin_issuance();

        assert!(cache.complete(older, SessionToken::new("user-a", "old", None)));
        assert!(cache.complete(newer, SessionToken::new("user-a", "new", None)));
        assert_eq!(cache.peek().unwrap().bearer(), "new");
    }

    #[test]
    fn invalidate_clears_and_discards_in_flight() {
        let cache = SessionTokenCache::new();
        let in_flight = cache.begin_issuance();
        cache.invalidate();

        assert!(!cache.complete(in_flight, SessionToken::new("user-a", "stale", None)));
        assert!(cache.peek().is_none());

        let fresh = cache.begin_issuance();
        assert!(cache.complete(fresh, SessionToken::new("user-a", "fresh", None)));
        assert_eq!(cache.peek().unwrap().bearer(), "fresh");
    }

    #[test]
    fn reuse_respects_owner() {
        let cache = SessionTokenCache::new();
        let ticket = cache.begin_issuance();
        cache.complete(ticket, SessionToken::new("user-a", "t", None));

        assert!(cache.get_reusable("user-b", now()).is_none());
        assert!(cache.peek().is_some());
    }
}
