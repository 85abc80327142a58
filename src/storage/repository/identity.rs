// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet context and provisioned identity repository.
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   wallet/context.json          # attached wallet id + recovery credential
//!   identities/{wallet_id}.json  # user id + lifetime token from signup
//! ```
//!
//! Session tokens are never stored here; only the long-lived signup result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{ensure_safe_key, FileStorage, StorageError, StorageResult};

/// Wallet the service acts for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredWalletContext {
    pub wallet_id: String,
    /// Recovery credential proving control of the wallet
    pub credential: String,
    pub attached_at: DateTime<Utc>,
}

/// Result of the one-time signup for a wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredIdentity {
    pub wallet_id: String,
    pub user_id: String,
    pub lifetime_token: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for wallet context and identity files.
pub struct IdentityRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> IdentityRepository<'a> {
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// The attached wallet context, if any.
    pub fn wallet_context(&self) -> StorageResult<Option<StoredWalletContext>> {
        self.storage
            .read_json_opt(self.storage.paths().wallet_context())
    }

    pub fn save_wallet_context(&self, context: &StoredWalletContext) -> StorageResult<()> {
        ensure_safe_key(&context.wallet_id)?;
        self.storage
            .write_json(self.storage.paths().wallet_context(), context)
    }

    /// Detach the wallet. Provisioned identities are kept.
    pub fn clear_wallet_context(&self) -> StorageResult<()> {
        match self.storage.delete(self.storage.paths().wallet_context()) {
            Ok(()) | Err(StorageError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn get_identity(&self, wallet_id: &str) -> StorageResult<Option<StoredIdentity>> {
        ensure_safe_key(wallet_id)?;
        self.storage
            .read_json_opt(self.storage.paths().identity(wallet_id))
    }

    pub fn save_identity(&self, identity: &StoredIdentity) -> StorageResult<()> {
        ensure_safe_key(&identity.wallet_id)?;
        self.storage
            .write_json(self.storage.paths().identity(&identity.wallet_id), identity)
    }
}
