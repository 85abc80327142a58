// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Exchange Create Interactor
//!
//! Drives the "create swap" screen: converts the amount the user types into
//! a volume and fiat value using one quote, validates the result and pushes
//! events to the presentation layer.
//!
//! The presentation owns the interactor and hands it the sending half of its
//! event channel. [`ExchangeCreateInteractor::detach`] drops that sender, the
//! rate subscription and every validation still in flight.

use std::sync::{Arc, Mutex};

use rust_decimal::{Decimal, RoundingStrategy};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::error::ExchangeError;
use super::rates::{RateFeed, RateFeedError, Subscription};
use super::sequence::{RequestSequencer, RequestTag};
use super::service::{OrderRequest, OrderValidationService, ValidationReport};
use super::types::{AccountId, FiatCurrency, FiatMarket, Fix, ModelError, Quote, TradingPair};

/// Fiat amounts are shown with cent precision.
pub const FIAT_DECIMALS: u32 = 2;

/// Volume and fiat value derived from the same quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertedAmounts {
    pub volume: Decimal,
    pub fiat_value: Decimal,
    pub price: Decimal,
}

/// Convert user input to both sides of the order.
///
/// Volume is truncated to the asset's precision so it never exceeds what the
/// user asked for; fiat values round half away from zero to cents.
pub fn convert_amount(
    amount: Decimal,
    fix: Fix,
    quote: &Quote,
) -> Result<ConvertedAmounts, ModelError> {
    if amount < Decimal::ZERO {
        return Err(ModelError::new("amount", "must not be negative"));
    }
    if quote.price <= Decimal::ZERO {
        return Err(ModelError::new("price", "must be positive"));
    }
    let asset_decimals = quote.market.asset.decimals();

    let (volume, fiat_value) = match fix {
        Fix::Base => {
            let volume = amount.round_dp_with_strategy(asset_decimals, RoundingStrategy::ToZero);
            let fiat_value = volume
                .checked_mul(quote.price)
                .ok_or_else(|| ModelError::new("amount", "too large"))?
                .round_dp_with_strategy(FIAT_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
            (volume, fiat_value)
        }
        Fix::BaseInFiat => {
            let fiat_value =
                amount.round_dp_with_strategy(FIAT_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
            let volume = fiat_value
                .checked_div(quote.price)
                .ok_or_else(|| ModelError::new("amount", "too large"))?
                .round_dp_with_strategy(asset_decimals, RoundingStrategy::ToZero);
            (volume, fiat_value)
        }
    };

    Ok(ConvertedAmounts {
        volume,
        fiat_value,
        price: quote.price,
    })
}

/// Events pushed to the presentation layer.
#[derive(Debug, Clone)]
pub enum ExchangeEvent {
    QuoteUpdated(Quote),
    QuoteFailed(RateFeedError),
    FixChanged(Fix),
    AmountsConverted(ConvertedAmounts),
    Validated {
        tag: RequestTag,
        report: ValidationReport,
    },
    ValidationFailed {
        tag: RequestTag,
        error_code: &'static str,
        message: String,
    },
}

type EventSender = mpsc::UnboundedSender<ExchangeEvent>;

pub struct ExchangeCreateInteractor {
    service: Arc<OrderValidationService>,
    feed: RateFeed,
    pair: TradingPair,
    market: FiatMarket,
    account_id: AccountId,
    fix: Mutex<Fix>,
    sequencer: RequestSequencer,
    output: Mutex<Option<EventSender>>,
    subscription: Mutex<Option<Subscription>>,
}

impl ExchangeCreateInteractor {
    pub fn new(
        service: Arc<OrderValidationService>,
        feed: RateFeed,
        pair: TradingPair,
        fiat: FiatCurrency,
        account_id: AccountId,
        output: EventSender,
    ) -> Self {
        Self {
            service,
            feed,
            market: FiatMarket::new(pair.from, fiat),
            pair,
            account_id,
            fix: Mutex::new(Fix::default()),
            sequencer: RequestSequencer::new(),
            output: Mutex::new(Some(output)),
            subscription: Mutex::new(None),
        }
    }

    pub fn market(&self) -> &FiatMarket {
        &self.market
    }

    /// Start forwarding quote updates for the source asset.
    pub fn start(&self) {
        let Some(sender) = self.sender() else {
            return;
        };
        let errors = sender.clone();
        let subscription = self.feed.subscribe(
            self.market.clone(),
            move |quote| {
                let _ = sender.send(ExchangeEvent::QuoteUpdated(quote));
            },
            move |error| {
                let _ = errors.send(ExchangeEvent::QuoteFailed(error));
            },
        );
        if let Ok(mut slot) = self.subscription.lock() {
            *slot = Some(subscription);
        }
    }

    pub fn fix(&self) -> Fix {
        self.fix.lock().map(|fix| *fix).unwrap_or_default()
    }

    /// Switch the side being typed. In-flight validations refer to the old
    /// side and are dropped.
    pub fn toggle_fix(&self) -> Fix {
        let fix = match self.fix.lock() {
            Ok(mut fix) => {
                *fix = fix.toggled();
                *fix
            }
            Err(_) => Fix::default(),
        };
        self.sequencer.cancel_all();
        self.emit(ExchangeEvent::FixChanged(fix));
        fix
    }

    /// Convert and validate `amount`.
    ///
    /// Returns `Ok(None)` when a newer submission (or a detach) overtook this
    /// one; nothing is emitted for it.
    pub async fn submit_amount(
        &self,
        amount: Decimal,
    ) -> Result<Option<ValidationReport>, ExchangeError> {
        let tag = self.sequencer.next();
        let result = self.convert_and_validate(amount).await;

        if !self.sequencer.is_current(tag) {
            debug!(tag = tag.value(), "Dropping superseded validation result");
            return Ok(None);
        }

        match result {
            Ok(report) => {
                self.emit(ExchangeEvent::Validated {
                    tag,
                    report: report.clone(),
                });
                Ok(Some(report))
            }
            Err(e) => {
                self.emit(ExchangeEvent::ValidationFailed {
                    tag,
                    error_code: e.error_code(),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn convert_and_validate(
        &self,
        amount: Decimal,
    ) -> Result<ValidationReport, ExchangeError> {
        let quote = self
            .feed
            .latest(&self.market)
            .ok_or_else(|| ExchangeError::QuoteUnavailable(self.market.clone()))?;
        let amounts = convert_amount(amount, self.fix(), &quote)?;
        self.emit(ExchangeEvent::AmountsConverted(amounts));

        let request = OrderRequest {
            pair: self.pair,
            fiat: self.market.fiat.clone(),
            account_id: self.account_id.clone(),
            volume: amounts.volume,
            fiat_value: amounts.fiat_value,
        };
        self.service.validate_order(&request).await
    }

    /// Tear down the link to the presentation layer.
    pub fn detach(&self) {
        self.sequencer.cancel_all();
        if let Ok(mut subscription) = self.subscription.lock() {
            subscription.take();
        }
        if let Ok(mut output) = self.output.lock() {
            output.take();
        }
        info!(market = %self.market, "Exchange interactor detached");
    }

    pub fn is_attached(&self) -> bool {
        self.output.lock().map(|o| o.is_some()).unwrap_or(false)
    }

    fn sender(&self) -> Option<EventSender> {
        self.output.lock().ok()?.clone()
    }

    fn emit(&self, event: ExchangeEvent) {
        if let Some(sender) = self.sender() {
            let _ = sender.send(event);
        }
    }
}
