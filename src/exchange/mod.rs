// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Exchange Module
//!
//! Domain logic of the swap flow:
//!
//! - [`types`]: assets, pairs, markets, limits and outcomes
//! - [`validator`]: pure order classification
//! - [`service`]: tradability check, concurrent fetch, classification
//! - [`rates`]: quote feed, subscriptions and the background poller
//! - [`interactor`]: the create-swap screen's driver
//! - [`sequence`]: tags used to drop overtaken results

pub mod error;
pub mod interactor;
pub mod rates;
pub mod sequence;
pub mod service;
pub mod tradability;
pub mod types;
pub mod validator;

pub use error::ExchangeError;
pub use interactor::{convert_amount, ConvertedAmounts, ExchangeCreateInteractor, ExchangeEvent};
pub use rates::{RateFeed, RateFeedError, RatePoller, RateSource, Subscription};
pub use sequence::{RequestSequencer, RequestTag};
pub use service::{
    BalanceSource, LimitsSource, OrderRequest, OrderValidationService, ValidationReport,
};
pub use tradability::TradingCapabilities;
pub use types::{
    AccountBalance, AccountId, AssetType, FiatCurrency, FiatMarket, Fix, ModelError,
    OrderCandidate, PeriodicWindow, Quote, TradeLimits, TradingPair, ValidationOutcome,
};
pub use validator::validate;
