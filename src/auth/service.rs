// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token acquisition.
//!
//! [`AuthenticationService`] ties together the provisioned identity, the
//! remote token issuer and the single-slot [`SessionTokenCache`]:
//!
//! - `get_token(false)` reuses the cached token while it belongs to the
//!   current user and is more than 30 seconds away from expiry
//! - `get_token(true)` always asks the issuer for a new token
//! - `invalidate()` drops the cached token; the next `get_token(false)`
//!   issues exactly once
//!
//! Issuance failures surface as [`AuthError::AuthenticationFailed`] and are
//! never retried here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::cache::SessionTokenCache;
use super::error::AuthError;
use super::provisioning::{IdentityProvisioner, ProvisionedIdentity, WalletContext};
use super::token::{Clock, SessionToken};
use crate::providers::ProviderError;

/// Remote issuance of session tokens for a provisioned identity.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self, identity: &ProvisionedIdentity) -> Result<SessionToken, ProviderError>;
}

/// Non-secret view of the cached token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub user_id: String,
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the token is still outside the expiry slack.
    pub fresh: bool,
}

pub struct AuthenticationService {
    provisioner: Arc<IdentityProvisioner>,
    issuer: Arc<dyn TokenIssuer>,
    cache: SessionTokenCache,
    clock: Arc<dyn Clock>,
    /// Serialises issuance so concurrent misses share one remote call.
    issuing: Mutex<()>,
}

impl AuthenticationService {
    pub fn new(
        provisioner: Arc<IdentityProvisioner>,
        issuer: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provisioner,
            issuer,
            cache: SessionTokenCache::new(),
            clock,
            issuing: Mutex::new(()),
        }
    }

    pub fn provisioner(&self) -> &Arc<IdentityProvisioner> {
        &self.provisioner
    }

    /// Return a session token for the current identity.
    pub async fn get_token(&self, force_refresh: bool) -> Result<SessionToken, AuthError> {
        let identity = self.provisioner.identity().await?;

        if !force_refresh {
            if let Some(token) = self.cache.get_reusable(&identity.user_id, self.clock.now()) {
                debug!(user_id = %identity.user_id, "Reusing cached session token");
                return Ok(token);
            }
        }

        let _guard = self.issuing.lock().await;

        // Another caller may have refreshed while we waited.
        if !force_refresh {
            if let Some(token) = self.cache.get_reusable(&identity.user_id, self.clock.now()) {
                return Ok(token);
            }
        }

        let ticket = self.cache.begin_issuance();
        let token = self.issuer.issue(&identity).await.map_err(|e| {
            warn!(user_id = %identity.user_id, error = %e, "Session token issuance failed");
            AuthError::AuthenticationFailed(e.to_string())
        })?;

        if token.user_id() != identity.user_id {
            warn!(
                expected = %identity.user_id,
                received = %token.user_id(),
                "Issued session token belongs to another user"
            );
            return Err(AuthError::AuthenticationFailed(
                "issued token belongs to another user".to_string(),
            ));
        }

        if self.cache.complete(ticket, token.clone()) {
            info!(
                user_id = %identity.user_id,
                expires_at = ?token.expires_at(),
                forced = force_refresh,
                "Issued session token"
            );
        } else {
            debug!(user_id = %identity.user_id, "Discarded superseded session token");
        }

        Ok(token)
    }

    /// Drop the cached token and any issuance in flight.
    pub fn invalidate(&self) {
        self.cache.invalidate();
        info!("Session token invalidated");
    }

    /// Cached token regardless of freshness.
    pub fn cached(&self) -> Option<SessionToken> {
        self.cache.peek()
    }

    pub fn status(&self) -> Option<SessionStatus> {
        let token = self.cache.peek()?;
        Some(SessionStatus {
            fresh: token.is_reusable_for(token.user_id(), self.clock.now()),
            user_id: token.user_id().to_string(),
            expires_at: token.expires_at(),
        })
    }

    /// Switch to another wallet. The cached token belongs to the old
    /// identity, so it is invalidated.
    pub async fn attach_wallet(&self, wallet: &WalletContext) -> Result<(), AuthError> {
        self.provisioner.attach_wallet(wallet).await?;
        self.invalidate();
        Ok(())
    }

    pub async fn detach_wallet(&self) -> Result<(), AuthError> {
        self.provisioner.detach_wallet().await?;
        self.invalidate();
        Ok(())
    }
}
