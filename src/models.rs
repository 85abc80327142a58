// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! Decimal amounts are serialized as strings so no precision is lost.
//!
//! ## Model Categories
//!
//! - **Wallet**: attaching the wallet the service acts for
//! - **Session**: status of the cached session token
//! - **Exchange**: assets, limits, quotes and order validation

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::SessionStatus;
use crate::exchange::{
    AssetType, Fix, PeriodicWindow, Quote, TradeLimits, TradingCapabilities, ValidationOutcome,
    ValidationReport,
};

// =============================================================================
// Wallet Models
// =============================================================================

/// Wallet context to attach.
#[derive(Clone, Deserialize, ToSchema)]
pub struct AttachWalletRequest {
    /// Wallet identifier in the wallet core.
    pub wallet_id: String,
    /// Recovery credential proving control of the wallet. Never echoed back.
    pub credential: String,
}

/// Currently attached wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct WalletContextResponse {
    pub attached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
}

// =============================================================================
// Session Models
// =============================================================================

/// Status of the cached session token. The bearer itself is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SessionStatusResponse {
    /// Whether a token is cached.
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the token would be reused rather than refreshed.
    pub fresh: bool,
}

impl From<Option<SessionStatus>> for SessionStatusResponse {
    fn from(status: Option<SessionStatus>) -> Self {
        match status {
            Some(status) => Self {
                active: true,
                user_id: Some(status.user_id),
                expires_at: status.expires_at,
                fresh: status.fresh,
            },
            None => Self {
                active: false,
                user_id: None,
                expires_at: None,
                fresh: false,
            },
        }
    }
}

// =============================================================================
// Exchange Models
// =============================================================================

/// An asset of the catalogue and whether it can be traded right now.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AssetInfo {
    pub asset: AssetType,
    /// Ticker code, e.g. `BTC`.
    pub code: String,
    pub name: String,
    pub decimals: u32,
    pub tradable: bool,
    /// Why trading is paused, when it is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AssetInfo {
    pub fn catalogue(capabilities: &TradingCapabilities) -> Vec<Self> {
        AssetType::ALL
            .into_iter()
            .map(|asset| {
                let reason = capabilities.check(asset).err().map(str::to_string);
                Self {
                    asset,
                    code: asset.code().to_string(),
                    name: asset.name().to_string(),
                    decimals: asset.decimals(),
                    tradable: reason.is_none(),
                    reason,
                }
            })
            .collect()
    }
}

/// Trading limits in the requested fiat currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LimitsResponse {
    pub currency: String,
    #[schema(value_type = String)]
    pub min_order: Decimal,
    #[schema(value_type = String)]
    pub max_possible_order: Decimal,
    /// Absent when the tier tracks no daily limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub daily_available: Option<Decimal>,
    /// Absent when the tier tracks no annual limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub annual_available: Option<Decimal>,
}

impl From<TradeLimits> for LimitsResponse {
    fn from(limits: TradeLimits) -> Self {
        Self {
            currency: limits.currency.to_string(),
            min_order: limits.min_order,
            max_possible_order: limits.max_possible_order,
            daily_available: limits.daily_available,
            annual_available: limits.annual_available,
        }
    }
}

/// Latest polled quote for a market.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct QuoteResponse {
    /// Market, e.g. `BTC-EUR`.
    pub pair: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            pair: quote.market.to_string(),
            price: quote.price,
            timestamp: quote.timestamp,
        }
    }
}

/// Order to validate.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateOrderRequest {
    /// Swap pair, e.g. `BTC-ETH`.
    pub pair: String,
    /// Fiat currency limits are expressed in, e.g. `EUR`.
    pub fiat: String,
    /// Account holding the source asset.
    pub account_id: String,
    /// Amount as typed by the user.
    #[schema(value_type = String)]
    pub amount: Decimal,
    /// Side the amount is expressed in.
    #[serde(default)]
    pub fix: Fix,
}

/// Classification of a validated order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ValidateOrderResponse {
    /// `accepted`, `insufficient_balance`, `below_minimum`,
    /// `above_periodic_limit` or `above_maximum`.
    pub outcome: String,
    pub accepted: bool,
    #[schema(value_type = String)]
    pub volume: Decimal,
    #[schema(value_type = String)]
    pub fiat_value: Decimal,
    #[schema(value_type = String)]
    pub price: Decimal,
    #[schema(value_type = String)]
    pub balance: Decimal,
    /// The violated limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub limit: Option<Decimal>,
    /// The order value compared against `limit`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub observed: Option<Decimal>,
    /// How far the order is past the violated limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub margin: Option<Decimal>,
    /// Window of a violated periodic limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<PeriodicWindow>,
}

impl ValidateOrderResponse {
    pub fn from_report(report: &ValidationReport, price: Decimal) -> Self {
        let window = match &report.outcome {
            ValidationOutcome::AbovePeriodicLimit { window, .. } => Some(*window),
            _ => None,
        };
        Self {
            outcome: report.outcome.code().to_string(),
            accepted: report.outcome.is_accepted(),
            volume: report.candidate.volume,
            fiat_value: report.candidate.fiat_value,
            price,
            balance: report.candidate.balance,
            limit: report.outcome.limit(),
            observed: report.outcome.observed(),
            margin: report.outcome.margin(),
            window,
        }
    }
}
