// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Failures of the exchange flow. Validation rejections are not errors; see
//! [`super::ValidationOutcome`].

use super::types::{AssetType, FiatMarket, ModelError};
use crate::auth::AuthError;
use crate::providers::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("no wallet is attached")]
    NotInitialized,

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("failed to fetch trade limits: {0}")]
    LimitsFetchFailed(#[source] ProviderError),

    #[error("failed to fetch account balance: {0}")]
    BalanceFetchFailed(#[source] ProviderError),

    #[error("{asset} is not tradable: {reason}")]
    AssetNotTradable { asset: AssetType, reason: String },

    #[error("no quote available for {0}")]
    QuoteUnavailable(FiatMarket),

    #[error(transparent)]
    InvalidInput(#[from] ModelError),
}

impl ExchangeError {
    /// Stable machine-readable code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExchangeError::NotInitialized => "not_initialized",
            ExchangeError::AuthenticationFailed(_) => "authentication_failed",
            ExchangeError::LimitsFetchFailed(_) => "limits_fetch_failed",
            ExchangeError::BalanceFetchFailed(_) => "balance_fetch_failed",
            ExchangeError::AssetNotTradable { .. } => "asset_not_tradable",
            ExchangeError::QuoteUnavailable(_) => "quote_unavailable",
            ExchangeError::InvalidInput(_) => "invalid_input",
        }
    }

    /// Classify a limits failure. Token problems keep their own code instead
    /// of being reported as a fetch failure.
    pub fn from_limits(error: ProviderError) -> Self {
        match error {
            ProviderError::Auth(auth) => auth.into(),
            other => ExchangeError::LimitsFetchFailed(other),
        }
    }
}

impl From<AuthError> for ExchangeError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::NotInitialized => ExchangeError::NotInitialized,
            other => ExchangeError::AuthenticationFailed(other.to_string()),
        }
    }
}
