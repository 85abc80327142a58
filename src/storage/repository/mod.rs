// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to file storage.

pub mod identity;

pub use identity::{IdentityRepository, StoredIdentity, StoredWalletContext};
