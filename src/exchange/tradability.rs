// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local lookup of which assets are currently enabled for trading.

use std::collections::HashMap;

use super::types::{AssetType, ModelError};

/// Administrative trading switches, resolved without any network call.
#[derive(Debug, Clone, Default)]
pub struct TradingCapabilities {
    paused: HashMap<AssetType, String>,
}

impl TradingCapabilities {
    /// Every asset enabled.
    pub fn all_enabled() -> Self {
        Self::default()
    }

    /// Pause trading for `asset` with a user-facing reason.
    pub fn with_paused(mut self, asset: AssetType, reason: impl Into<String>) -> Self {
        self.paused.insert(asset, reason.into());
        self
    }

    /// Build from a comma separated list of asset codes, e.g. `XLM,BCH`.
    pub fn from_paused_codes(raw: &str) -> Result<Self, ModelError> {
        let mut capabilities = Self::all_enabled();
        for code in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            let asset: AssetType = code.parse()?;
            capabilities = capabilities.with_paused(
                asset,
                format!("{} trading is temporarily paused", asset.name()),
            );
        }
        Ok(capabilities)
    }

    /// `Err(reason)` when the asset may not be traded right now.
    pub fn check(&self, asset: AssetType) -> Result<(), &str> {
        match self.paused.get(&asset) {
            Some(reason) => Err(reason.as_str()),
            None => Ok(()),
        }
    }

    pub fn is_tradable(&self, asset: AssetType) -> bool {
        self.check(asset).is_ok()
    }

    pub fn paused_assets(&self) -> impl Iterator<Item = AssetType> + '_ {
        self.paused.keys().copied()
    }
}
