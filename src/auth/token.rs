// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session tokens and the reuse policy applied to them.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

/// A cached token is refreshed once it is this close to expiry.
pub const EXPIRY_SLACK: Duration = Duration::seconds(30);

/// Short-lived bearer credential for the identity backend.
///
/// Lives in memory only; it is never written to durable storage.
#[derive(Clone)]
pub struct SessionToken {
    user_id: String,
    bearer: SecretString,
    expires_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    pub fn new(
        user_id: impl Into<String>,
        bearer: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            bearer: SecretString::from(bearer.into()),
            expires_at,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// `None` means the token does not expire.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Expose the bearer credential for an `Authorization` header.
    ///
    /// Never log the return value.
    pub fn bearer(&self) -> &str {
        self.bearer.expose_secret()
    }

    /// Reusable for `current_user_id` at `now`: same owner, and either
    /// non-expiring or more than [`EXPIRY_SLACK`] away from expiry.
    pub fn is_reusable_for(&self, current_user_id: &str, now: DateTime<Utc>) -> bool {
        if self.user_id != current_user_id {
            return false;
        }
        match self.expires_at {
            None => true,
            Some(expires_at) => now + EXPIRY_SLACK < expires_at,
        }
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("user_id", &self.user_id)
            .field("bearer", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of "now", injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        if let Ok(mut now) = self.now.lock() {
            *now = to;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|p| *p.into_inner())
    }
}
