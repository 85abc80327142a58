// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Durable Storage Module
//!
//! Persists the attached wallet context and the identity provisioned for it
//! as JSON files under `DATA_DIR`. Writes go to a temp file and are renamed
//! into place.
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   wallet/
//!     context.json
//!   identities/
//!     {wallet_id}.json
//! ```
//!
//! Session tokens are process-lifetime only and never reach this module.

pub mod file_store;
pub mod paths;
pub mod repository;

pub use file_store::{ensure_safe_key, FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;
pub use repository::{IdentityRepository, StoredIdentity, StoredWalletContext};
