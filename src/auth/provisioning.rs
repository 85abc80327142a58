// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity provisioning for the attached wallet.
//!
//! The first time a wallet is used, a remote signup call turns the wallet id
//! and recovery credential into a `(user_id, lifetime_token)` pair. That pair
//! is persisted and reused for every later token issuance.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::info;

use super::error::AuthError;
use crate::providers::ProviderError;
use crate::storage::{
    ensure_safe_key, FileStorage, IdentityRepository, StoredIdentity, StoredWalletContext,
};

/// Wallet identifier plus the credential proving control of it.
#[derive(Clone)]
pub struct WalletContext {
    pub wallet_id: String,
    credential: SecretString,
}

impl WalletContext {
    pub fn new(wallet_id: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            credential: SecretString::from(credential.into()),
        }
    }

    pub fn credential(&self) -> &str {
        self.credential.expose_secret()
    }
}

impl std::fmt::Debug for WalletContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletContext")
            .field("wallet_id", &self.wallet_id)
            .field("credential", &"[REDACTED]")
            .finish()
    }
}

/// What the signup endpoint hands back.
#[derive(Clone)]
pub struct SignupResult {
    pub user_id: String,
    pub lifetime_token: SecretString,
}

/// User identity bound to a wallet, used to request session tokens.
#[derive(Clone)]
pub struct ProvisionedIdentity {
    pub wallet_id: String,
    pub user_id: String,
    lifetime_token: SecretString,
}

impl ProvisionedIdentity {
    pub fn new(
        wallet_id: impl Into<String>,
        user_id: impl Into<String>,
        lifetime_token: impl Into<String>,
    ) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            user_id: user_id.into(),
            lifetime_token: SecretString::from(lifetime_token.into()),
        }
    }

    pub fn lifetime_token(&self) -> &str {
        self.lifetime_token.expose_secret()
    }
}

impl std::fmt::Debug for ProvisionedIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisionedIdentity")
            .field("wallet_id", &self.wallet_id)
            .field("user_id", &self.user_id)
            .field("lifetime_token", &"[REDACTED]")
            .finish()
    }
}

impl From<StoredIdentity> for ProvisionedIdentity {
    fn from(stored: StoredIdentity) -> Self {
        Self::new(stored.wallet_id, stored.user_id, stored.lifetime_token)
    }
}

/// Remote one-time user signup.
#[async_trait]
pub trait SignupApi: Send + Sync {
    async fn sign_up(&self, wallet: &WalletContext) -> Result<SignupResult, ProviderError>;
}

/// Resolves (and lazily creates) the identity of the attached wallet.
pub struct IdentityProvisioner {
    storage: Arc<FileStorage>,
    signup: Arc<dyn SignupApi>,
    /// Memoised identity; the lock also serialises signups.
    current: Mutex<Option<ProvisionedIdentity>>,
}

impl IdentityProvisioner {
    pub fn new(storage: Arc<FileStorage>, signup: Arc<dyn SignupApi>) -> Self {
        Self {
            storage,
            signup,
            current: Mutex::new(None),
        }
    }

    /// Attach (or replace) the wallet this service acts for.
    pub async fn attach_wallet(&self, wallet: &WalletContext) -> Result<(), AuthError> {
        ensure_safe_key(&wallet.wallet_id)?;
        let mut current = self.current.lock().await;

        IdentityRepository::new(&self.storage).save_wallet_context(&StoredWalletContext {
            wallet_id: wallet.wallet_id.clone(),
            credential: wallet.credential().to_string(),
            attached_at: Utc::now(),
        })?;
        *current = None;

        info!(wallet_id = %wallet.wallet_id, "Wallet context attached");
        Ok(())
    }

    /// Detach the wallet; later calls fail with [`AuthError::NotInitialized`].
    pub async fn detach_wallet(&self) -> Result<(), AuthError> {
        let mut current = self.current.lock().await;
        IdentityRepository::new(&self.storage).clear_wallet_context()?;
        *current = None;
        info!("Wallet context detached");
        Ok(())
    }

    /// Id of the attached wallet, if any.
    pub async fn wallet_id(&self) -> Result<Option<String>, AuthError> {
        let context = IdentityRepository::new(&self.storage).wallet_context()?;
        Ok(context.map(|c| c.wallet_id))
    }

    /// Identity of the attached wallet, signing up once if none is stored.
    pub async fn identity(&self) -> Result<ProvisionedIdentity, AuthError> {
        let mut current = self.current.lock().await;
        if let Some(identity) = current.as_ref() {
            return Ok(identity.clone());
        }

        let repo = IdentityRepository::new(&self.storage);
        let context = repo.wallet_context()?.ok_or(AuthError::NotInitialized)?;

        let identity = match repo.get_identity(&context.wallet_id)? {
            Some(stored) => ProvisionedIdentity::from(stored),
            None => {
                let wallet = WalletContext::new(&context.wallet_id, &context.credential);
                let signup = self
                    .signup
                    .sign_up(&wallet)
                    .await
                    .map_err(|e| AuthError::SignupFailed(e.to_string()))?;

                if signup.user_id.trim().is_empty() {
                    return Err(AuthError::SignupFailed(
                        "signup response did not include a user id".to_string(),
                    ));
                }

                let stored = StoredIdentity {
                    wallet_id: context.wallet_id.clone(),
                    user_id: signup.user_id,
                    lifetime_token: signup.lifetime_token.expose_secret().to_string(),
                    created_at: Utc::now(),
                };
                repo.save_identity(&stored)?;

                info!(
                    wallet_id = %stored.wallet_id,
                    user_id = %stored.user_id,
                    "Provisioned user identity"
                );
                ProvisionedIdentity::from(stored)
            }
        };

        *current = Some(identity.clone());
        Ok(identity)
    }
}
