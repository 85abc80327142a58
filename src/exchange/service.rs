// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order validation against live limits and balance.
//!
//! 1. Both assets of the pair are checked against the local tradability
//!    switches; nothing is fetched for a paused asset.
//! 2. Limits and balance are fetched concurrently. Either failure fails the
//!    whole operation.
//! 3. The candidate is classified by [`super::validate`].

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use super::error::ExchangeError;
use super::tradability::TradingCapabilities;
use super::types::{
    AccountBalance, AccountId, FiatCurrency, ModelError, OrderCandidate, TradeLimits,
    TradingPair, ValidationOutcome,
};
use super::validator::validate;
use crate::providers::ProviderError;

/// Trading limits for the current user.
#[async_trait]
pub trait LimitsSource: Send + Sync {
    async fn fetch_limits(&self, currency: &FiatCurrency) -> Result<TradeLimits, ProviderError>;
}

/// Account balances held by the wallet core.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch_balance(&self, account: &AccountId) -> Result<AccountBalance, ProviderError>;
}

/// A trade the user is about to place. `volume` and `fiat_value` must come
/// from the same quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub pair: TradingPair,
    pub fiat: FiatCurrency,
    pub account_id: AccountId,
    pub volume: Decimal,
    pub fiat_value: Decimal,
}

impl OrderRequest {
    /// Reject amounts no quote could have produced.
    pub fn check_amounts(&self) -> Result<(), ModelError> {
        for (field, value) in [("volume", self.volume), ("fiat_value", self.fiat_value)] {
            if value < Decimal::ZERO {
                return Err(ModelError::new(field, "must not be negative"));
            }
        }
        Ok(())
    }
}

/// Outcome plus the inputs it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub candidate: OrderCandidate,
    pub limits: TradeLimits,
    pub outcome: ValidationOutcome,
}

pub struct OrderValidationService {
    limits: Arc<dyn LimitsSource>,
    balances: Arc<dyn BalanceSource>,
    capabilities: TradingCapabilities,
}

impl OrderValidationService {
    pub fn new(
        limits: Arc<dyn LimitsSource>,
        balances: Arc<dyn BalanceSource>,
        capabilities: TradingCapabilities,
    ) -> Self {
        Self {
            limits,
            balances,
            capabilities,
        }
    }

    pub fn capabilities(&self) -> &TradingCapabilities {
        &self.capabilities
    }

    pub fn check_tradable(&self, pair: TradingPair) -> Result<(), ExchangeError> {
        for asset in [pair.from, pair.to] {
            self.capabilities
                .check(asset)
                .map_err(|reason| ExchangeError::AssetNotTradable {
                    asset,
                    reason: reason.to_string(),
                })?;
        }
        Ok(())
    }

    pub async fn fetch_limits(&self, currency: &FiatCurrency) -> Result<TradeLimits, ExchangeError> {
        self.limits
            .fetch_limits(currency)
            .await
            .map_err(ExchangeError::from_limits)
    }

    /// Fetch limits and balance concurrently.
    pub async fn fetch_limits_and_balance(
        &self,
        currency: &FiatCurrency,
        account: &AccountId,
    ) -> Result<(TradeLimits, AccountBalance), ExchangeError> {
        let limits = self.fetch_limits(currency);
        let balance = async {
            self.balances
                .fetch_balance(account)
                .await
                .map_err(ExchangeError::BalanceFetchFailed)
        };
        tokio::try_join!(limits, balance)
    }

    pub async fn validate_order(
        &self,
        request: &OrderRequest,
    ) -> Result<ValidationReport, ExchangeError> {
        self.check_tradable(request.pair)?;
        request.check_amounts()?;

        let (limits, balance) = self
            .fetch_limits_and_balance(&request.fiat, &request.account_id)
            .await?;

        if balance.asset != request.pair.from {
            return Err(ModelError::new(
                "account_id",
                format!(
                    "account {} holds {}, order sells {}",
                    request.account_id, balance.asset, request.pair.from
                ),
            )
            .into());
        }

        let candidate = OrderCandidate::new(
            request.volume,
            request.fiat_value,
            balance.balance,
            request.account_id.clone(),
        )?;
        let outcome = validate(&candidate, &limits);

        info!(
            pair = %request.pair,
            account_id = %request.account_id,
            outcome = outcome.code(),
            "Validated order"
        );

        Ok(ValidationReport {
            candidate,
            limits,
            outcome,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::exchange::{AssetType, PeriodicWindow};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    pub(crate) struct FakeLimits {
        pub limits: TradeLimits,
        pub calls: AtomicUsize,
        pub fail: bool,
        pub barrier: Option<Arc<Barrier>>,
    }

    #[async_trait]
    impl LimitsSource for FakeLimits {
        async fn fetch_limits(
            &self,
            _currency: &FiatCurrency,
        ) -> Result<TradeLimits, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            if self.fail {
                return Err(ProviderError::Request("limits down".to_string()));
            }
            Ok(self.limits.clone())
        }
    }

    pub(crate) struct FakeBalance {
        pub asset: AssetType,
        pub balance: Decimal,
        pub calls: AtomicUsize,
        pub fail: bool,
        pub barrier: Option<Arc<Barrier>>,
    }

    #[async_trait]
    impl BalanceSource for FakeBalance {
        async fn fetch_balance(
            &self,
            account: &AccountId,
        ) -> Result<AccountBalance, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(barrier) = &self.barrier {
                barrier.wait().await;
            }
            if self.fail {
                return Err(ProviderError::Request("wallet core down".to_string()));
            }
            Ok(AccountBalance {
                account_id: account.clone(),
                asset: self.asset,
                balance: self.balance,
            })
        }
    }

    pub(crate) fn eur() -> FiatCurrency {
        FiatCurrency::parse("EUR").unwrap()
    }

    pub(crate) fn limits(daily: Option<Decimal>, annual: Option<Decimal>) -> TradeLimits {
        TradeLimits::new(eur(), dec!(10), dec!(1000), daily, annual).unwrap()
    }

    pub(crate) fn fake_limits(limits: TradeLimits) -> FakeLimits {
        FakeLimits {
            limits,
            calls: AtomicUsize::new(0),
            fail: false,
            barrier: None,
        }
    }

    pub(crate) fn fake_balance(balance: Decimal) -> FakeBalance {
        FakeBalance {
            asset: AssetType::Bitcoin,
            balance,
            calls: AtomicUsize::new(0),
            fail: false,
            barrier: None,
        }
    }

    fn request(volume: Decimal, fiat_value: Decimal) -> OrderRequest {
        OrderRequest {
            pair: TradingPair::new(AssetType::Bitcoin, AssetType::Ethereum).unwrap(),
            fiat: eur(),
            account_id: AccountId::parse("acc-1").unwrap(),
            volume,
            fiat_value,
        }
    }

    fn service(limits: FakeLimits, balance: FakeBalance) -> OrderValidationService {
        OrderValidationService::new(
            Arc::new(limits),
            Arc::new(balance),
            TradingCapabilities::all_enabled(),
        )
    }

    #[tokio::test]
    async fn accepted_order_reports_inputs() {
        let service = service(
            fake_limits(limits(Some(dec!(500)), None)),
            fake_balance(dec!(2)),
        );

        let report = service
            .validate_order(&request(dec!(1), dec!(100)))
            .await
            .unwrap();

        assert_eq!(report.outcome, ValidationOutcome::Accepted);
        assert_eq!(report.candidate.balance, dec!(2));
        assert_eq!(report.limits.daily_available, Some(dec!(500)));
    }

    #[tokio::test]
    async fn daily_limit_rejection_carries_margin() {
        let service = service(
            fake_limits(limits(Some(dec!(50)), Some(dec!(900)))),
            fake_balance(dec!(2)),
        );

        let report = service
            .validate_order(&request(dec!(1), dec!(80)))
            .await
            .unwrap();

        assert_eq!(
            report.outcome,
            ValidationOutcome::AbovePeriodicLimit {
                window: PeriodicWindow::Daily,
                available: dec!(50),
                fiat_value: dec!(80),
            }
        );
        assert_eq!(report.outcome.margin(), Some(dec!(30)));
    }

    #[tokio::test]
    async fn paused_asset_fails_before_any_fetch() {
        let limits = Arc::new(fake_limits(limits(None, None)));
        let balance = Arc::new(fake_balance(dec!(1)));
        let service = OrderValidationService::new(
            limits.clone(),
            balance.clone(),
            TradingCapabilities::all_enabled().with_paused(AssetType::Ethereum, "maintenance"),
        );

        let err = service
            .validate_order(&request(dec!(1), dec!(100)))
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "asset_not_tradable");
        assert!(err.to_string().contains("maintenance"));
        assert_eq!(limits.calls.load(Ordering::SeqCst), 0);
        assert_eq!(balance.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn limits_failure_fails_the_operation() {
        let mut limits = fake_limits(limits(None, None));
        limits.fail = true;
        let service = service(limits, fake_balance(dec!(1)));

        let err = service
            .validate_order(&request(dec!(1), dec!(100)))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "limits_fetch_failed");
    }

    #[tokio::test]
    async fn balance_failure_fails_the_operation() {
        let mut balance = fake_balance(dec!(1));
        balance.fail = true;
        let service = service(fake_limits(limits(None, None)), balance);

        let err = service
            .validate_order(&request(dec!(1), dec!(100)))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "balance_fetch_failed");
    }

    #[tokio::test]
    async fn limits_and_balance_are_fetched_concurrently() {
        // Each fetch waits for the other; a sequential join would never finish.
        let barrier = Arc::new(Barrier::new(2));
        let mut limits = fake_limits(limits(None, None));
        limits.barrier = Some(barrier.clone());
        let mut balance = fake_balance(dec!(3));
        balance.barrier = Some(barrier);
        let service = service(limits, balance);

        let (limits, balance) = tokio::time::timeout(
            Duration::from_secs(5),
            service.fetch_limits_and_balance(&eur(), &AccountId::parse("acc-1").unwrap()),
        )
        .await
        .expect("fetches should run concurrently")
        .unwrap();

        assert_eq!(limits.max_possible_order, dec!(1000));
        assert_eq!(balance.balance, dec!(3));
    }

    #[tokio::test]
    async fn account_holding_other_asset_is_invalid_input() {
        let mut balance = fake_balance(dec!(5));
        balance.asset = AssetType::Stellar;
        let service = service(fake_limits(limits(None, None)), balance);

        let err = service
            .validate_order(&request(dec!(1), dec!(100)))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "invalid_input");
    }

    #[tokio::test]
    async fn negative_amounts_fail_before_any_fetch() {
        let limits = Arc::new(fake_limits(limits(None, None)));
        let balance = Arc::new(fake_balance(dec!(5)));
        let service = OrderValidationService::new(
            limits.clone(),
            balance.clone(),
            TradingCapabilities::all_enabled(),
        );

        for order in [request(dec!(-1), dec!(100)), request(dec!(1), dec!(-0.01))] {
            let err = service.validate_order(&order).await.unwrap_err();
            assert!(matches!(err, ExchangeError::InvalidInput(_)));
        }
        assert_eq!(limits.calls.load(Ordering::SeqCst), 0);
        assert_eq!(balance.calls.load(Ordering::SeqCst), 0);
    }
}
