// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the durable storage layout.

use std::path::{Path, PathBuf};

/// Base directory for all persistent storage.
pub const DATA_ROOT: &str = "/data";

/// Storage path utilities.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Wallet Context ==========

    /// Directory holding the attached wallet context.
    pub fn wallet_dir(&self) -> PathBuf {
        self.root.join("wallet")
    }

    /// Path to the attached wallet context file.
    pub fn wallet_context(&self) -> PathBuf {
        self.wallet_dir().join("context.json")
    }

    // ========== Provisioned Identities ==========

    /// Directory containing one identity file per wallet.
    pub fn identities_dir(&self) -> PathBuf {
        self.root.join("identities")
    }

    /// Path to the identity provisioned for a wallet.
    pub fn identity(&self, wallet_id: &str) -> PathBuf {
        self.identities_dir().join(format!("{wallet_id}.json"))
    }
}
