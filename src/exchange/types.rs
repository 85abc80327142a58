// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Exchange domain types: assets, pairs, limits, candidates and outcomes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rejected construction of a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ModelError {
    pub field: &'static str,
    pub reason: String,
}

impl ModelError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Assets
// =============================================================================

/// Crypto assets the wallet can swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Bitcoin,
    BitcoinCash,
    Ethereum,
    Stellar,
    Pax,
}

impl AssetType {
    pub const ALL: [AssetType; 5] = [
        AssetType::Bitcoin,
        AssetType::BitcoinCash,
        AssetType::Ethereum,
        AssetType::Stellar,
        AssetType::Pax,
    ];

    /// Ticker code used on the wire (`BTC`, `ETH`, ...).
    pub fn code(self) -> &'static str {
        match self {
            AssetType::Bitcoin => "BTC",
            AssetType::BitcoinCash => "BCH",
            AssetType::Ethereum => "ETH",
            AssetType::Stellar => "XLM",
            AssetType::Pax => "PAX",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AssetType::Bitcoin => "Bitcoin",
            AssetType::BitcoinCash => "Bitcoin Cash",
            AssetType::Ethereum => "Ether",
            AssetType::Stellar => "Stellar",
            AssetType::Pax => "USD PAX",
        }
    }

    /// Smallest-unit precision of the asset.
    pub fn decimals(self) -> u32 {
        match self {
            AssetType::Bitcoin | AssetType::BitcoinCash => 8,
            AssetType::Ethereum | AssetType::Pax => 18,
            AssetType::Stellar => 7,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|asset| asset.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AssetType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
            .ok_or_else(|| ModelError::new("asset", format!("unknown asset code `{}`", s.trim())))
    }
}

// =============================================================================
// Fiat currency
// =============================================================================

/// ISO 4217 style fiat currency code, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiatCurrency(String);

impl FiatCurrency {
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let code = raw.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ModelError::new(
                "currency",
                format!("`{code}` is not a three-letter currency code"),
            ));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FiatCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FiatCurrency {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Pairs and markets
// =============================================================================

/// Source and destination asset of a swap, written `BTC-ETH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradingPair {
    pub from: AssetType,
    pub to: AssetType,
}

impl TradingPair {
    pub fn new(from: AssetType, to: AssetType) -> Result<Self, ModelError> {
        if from == to {
            return Err(ModelError::new(
                "pair",
                format!("cannot swap {from} into itself"),
            ));
        }
        Ok(Self { from, to })
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

impl FromStr for TradingPair {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ModelError::new("pair", format!("expected `FROM-TO`, got `{s}`")))?;
        Self::new(from.parse()?, to.parse()?)
    }
}

/// An asset priced in a fiat currency, written `BTC-EUR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FiatMarket {
    pub asset: AssetType,
    pub fiat: FiatCurrency,
}

impl FiatMarket {
    pub fn new(asset: AssetType, fiat: FiatCurrency) -> Self {
        Self { asset, fiat }
    }
}

impl fmt::Display for FiatMarket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.asset, self.fiat)
    }
}

impl FromStr for FiatMarket {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (asset, fiat) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ModelError::new("market", format!("expected `ASSET-FIAT`, got `{s}`")))?;
        Ok(Self::new(asset.parse()?, fiat.parse()?))
    }
}

/// Price of one unit of `market.asset` in `market.fiat`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub market: FiatMarket,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Which side of the trade the user is typing into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Fix {
    /// Amount is entered in the source asset.
    #[default]
    Base,
    /// Amount is entered as the source asset's fiat equivalent.
    BaseInFiat,
}

impl Fix {
    pub fn toggled(self) -> Self {
        match self {
            Fix::Base => Fix::BaseInFiat,
            Fix::BaseInFiat => Fix::Base,
        }
    }
}

// =============================================================================
// Limits, candidates and outcomes
// =============================================================================

/// Limits for the user's tier, denominated in the trade's fiat currency.
///
/// `None` for a periodic amount means the tier tracks no such limit; it is
/// not the same as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeLimits {
    pub currency: FiatCurrency,
    pub min_order: Decimal,
    pub max_possible_order: Decimal,
    pub daily_available: Option<Decimal>,
    pub annual_available: Option<Decimal>,
}

/// Window a periodic limit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PeriodicWindow {
    Daily,
    Annual,
}

impl TradeLimits {
    pub fn new(
        currency: FiatCurrency,
        min_order: Decimal,
        max_possible_order: Decimal,
        daily_available: Option<Decimal>,
        annual_available: Option<Decimal>,
    ) -> Result<Self, ModelError> {
        if min_order < Decimal::ZERO {
            return Err(ModelError::new("min_order", "must not be negative"));
        }
        if max_possible_order < Decimal::ZERO {
            return Err(ModelError::new("max_possible_order", "must not be negative"));
        }
        if min_order > max_possible_order {
            return Err(ModelError::new(
                "min_order",
                format!("{min_order} exceeds max_possible_order {max_possible_order}"),
            ));
        }
        if daily_available.is_some_and(|v| v < Decimal::ZERO) {
            return Err(ModelError::new("daily.available", "must not be negative"));
        }
        if annual_available.is_some_and(|v| v < Decimal::ZERO) {
            return Err(ModelError::new("annual.available", "must not be negative"));
        }

        Ok(Self {
            currency,
            min_order,
            max_possible_order,
            daily_available,
            annual_available,
        })
    }

    /// The periodic amount still available: daily first, then annual.
    pub fn periodic_available(&self) -> Option<(PeriodicWindow, Decimal)> {
        self.daily_available
            .map(|v| (PeriodicWindow::Daily, v))
            .or_else(|| self.annual_available.map(|v| (PeriodicWindow::Annual, v)))
    }
}

/// Account identifier in the wallet core.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(ModelError::new("account_id", "must not be empty"));
        }
        if id.chars().all(|c| c == '.') {
            return Err(ModelError::new("account_id", "must not be a dot segment"));
        }
        if let Some(c) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
        {
            return Err(ModelError::new(
                "account_id",
                format!("must not contain `{c}`"),
            ));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Spendable balance of one account, in the account's asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub asset: AssetType,
    pub balance: Decimal,
}

/// A proposed trade. Volume and fiat value come from the same quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCandidate {
    pub volume: Decimal,
    pub fiat_value: Decimal,
    pub balance: Decimal,
    pub account_id: AccountId,
}

impl OrderCandidate {
    pub fn new(
        volume: Decimal,
        fiat_value: Decimal,
        balance: Decimal,
        account_id: AccountId,
    ) -> Result<Self, ModelError> {
        for (field, value) in [
            ("volume", volume),
            ("fiat_value", fiat_value),
            ("balance", balance),
        ] {
            if value < Decimal::ZERO {
                return Err(ModelError::new(field, "must not be negative"));
            }
        }
        Ok(Self {
            volume,
            fiat_value,
            balance,
            account_id,
        })
    }
}

/// Classification of an [`OrderCandidate`]. Rejections are guidance for the
/// user, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    InsufficientBalance {
        balance: Decimal,
        volume: Decimal,
    },
    BelowMinimum {
        minimum: Decimal,
        fiat_value: Decimal,
    },
    AbovePeriodicLimit {
        window: PeriodicWindow,
        available: Decimal,
        fiat_value: Decimal,
    },
    AboveMaximum {
        maximum: Decimal,
        fiat_value: Decimal,
    },
    Accepted,
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted)
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationOutcome::InsufficientBalance { .. } => "insufficient_balance",
            ValidationOutcome::BelowMinimum { .. } => "below_minimum",
            ValidationOutcome::AbovePeriodicLimit { .. } => "above_periodic_limit",
            ValidationOutcome::AboveMaximum { .. } => "above_maximum",
            ValidationOutcome::Accepted => "accepted",
        }
    }

    /// The limit that was violated.
    pub fn limit(&self) -> Option<Decimal> {
        match self {
            ValidationOutcome::InsufficientBalance { balance, .. } => Some(*balance),
            ValidationOutcome::BelowMinimum { minimum, .. } => Some(*minimum),
            ValidationOutcome::AbovePeriodicLimit { available, .. } => Some(*available),
            ValidationOutcome::AboveMaximum { maximum, .. } => Some(*maximum),
            ValidationOutcome::Accepted => None,
        }
    }

    /// The candidate value that was compared against [`Self::limit`].
    pub fn observed(&self) -> Option<Decimal> {
        match self {
            ValidationOutcome::InsufficientBalance { volume, .. } => Some(*volume),
            ValidationOutcome::BelowMinimum { fiat_value, .. }
            | ValidationOutcome::AbovePeriodicLimit { fiat_value, .. }
            | ValidationOutcome::AboveMaximum { fiat_value, .. } => Some(*fiat_value),
            ValidationOutcome::Accepted => None,
        }
    }

    /// Distance between the observed value and the violated limit.
    pub fn margin(&self) -> Option<Decimal> {
        let (limit, observed) = (self.limit()?, self.observed()?);
        Some((observed - limit).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eur() -> FiatCurrency {
        FiatCurrency::parse("eur").unwrap()
    }

    #[test]
    fn asset_codes_round_trip_case_insensitively() {
        assert_eq!(AssetType::from_code("btc"), Some(AssetType::Bitcoin));
        assert_eq!(" XLM ".parse::<AssetType>().unwrap(), AssetType::Stellar);
        assert!("DOGE".parse::<AssetType>().is_err());
    }

    #[test]
    fn fiat_currency_is_normalised() {
        assert_eq!(eur().as_str(), "EUR");
        assert!(FiatCurrency::parse("EURO").is_err());
        assert!(FiatCurrency::parse("E1R").is_err());
    }

    #[test]
    fn trading_pair_parses_and_rejects_self_swap() {
        let pair: TradingPair = "btc-eth".parse().unwrap();
        assert_eq!(pair.from, AssetType::Bitcoin);
        assert_eq!(pair.to, AssetType::Ethereum);
        assert_eq!(pair.to_string(), "BTC-ETH");

        assert!("BTC-BTC".parse::<TradingPair>().is_err());
        assert!("BTCETH".parse::<TradingPair>().is_err());
    }

    #[test]
    fn fiat_market_display() {
        let market: FiatMarket = "eth-usd".parse().unwrap();
        assert_eq!(market.to_string(), "ETH-USD");
    }

    #[test]
    fn limits_reject_min_above_max() {
        let err = TradeLimits::new(eur(), dec!(100), dec!(10), None, None).unwrap_err();
        assert_eq!(err.field, "min_order");
    }

    #[test]
    fn limits_reject_negative_available() {
        let err = TradeLimits::new(eur(), dec!(1), dec!(10), Some(dec!(-1)), None).unwrap_err();
        assert_eq!(err.field, "daily.available");
    }

    #[test]
    fn periodic_available_prefers_daily_then_annual() {
        let both = TradeLimits::new(eur(), dec!(1), dec!(10), Some(dec!(5)), Some(dec!(50))).unwrap();
        assert_eq!(both.periodic_available(), Some((PeriodicWindow::Daily, dec!(5))));

        let annual = TradeLimits::new(eur(), dec!(1), dec!(10), None, Some(dec!(50))).unwrap();
        assert_eq!(annual.periodic_available(), Some((PeriodicWindow::Annual, dec!(50))));

        let none = TradeLimits::new(eur(), dec!(1), dec!(10), None, None).unwrap();
        assert_eq!(none.periodic_available(), None);
    }

    #[test]
    fn candidate_rejects_negative_amounts() {
        let account = AccountId::parse("acc-1").unwrap();
        let err = OrderCandidate::new(dec!(-0.1), dec!(1), dec!(1), account).unwrap_err();
        assert_eq!(err.field, "volume");
    }

    #[test]
    fn account_id_rejects_blank_and_path_segments() {
        assert!(AccountId::parse("  ").is_err());
        assert!(AccountId::parse("a/b").is_err());
        for id in ["..", ".", "a?b", "a#b", "a%2e", "a b"] {
            assert!(AccountId::parse(id).is_err(), "{id} should be rejected");
        }
        assert_eq!(
            AccountId::parse("acc_1.main:btc").unwrap().as_str(),
            "acc_1.main:btc"
        );
        assert_eq!(AccountId::parse(" acc ").unwrap().as_str(), "acc");
    }

    #[test]
    fn outcome_margin_is_distance_to_limit() {
        let outcome = ValidationOutcome::AboveMaximum {
            maximum: dec!(10000),
            fiat_value: dec!(12500.50),
        };
        assert_eq!(outcome.margin(), Some(dec!(2500.50)));
        assert_eq!(outcome.code(), "above_maximum");
        assert_eq!(ValidationOutcome::Accepted.margin(), None);
    }
}
