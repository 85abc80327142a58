// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order classification against balance and tier limits.
//!
//! Rules are checked in a fixed order and the first match wins:
//!
//! 1. balance < volume                      → insufficient balance
//! 2. fiat value < minimum                  → below minimum
//! 3. fiat value >= daily (else annual)     → above periodic limit
//! 4. fiat value >= maximum                 → above maximum
//!
//! The periodic rule is skipped when the tier tracks neither a daily nor an
//! annual amount. Everything is compared as exact decimals.

use super::types::{OrderCandidate, TradeLimits, ValidationOutcome};

/// Classify `candidate` against freshly fetched `limits`.
pub fn validate(candidate: &OrderCandidate, limits: &TradeLimits) -> ValidationOutcome {
    if candidate.balance < candidate.volume {
        return ValidationOutcome::InsufficientBalance {
            balance: candidate.balance,
            volume: candidate.volume,
        };
    }

    if candidate.fiat_value < limits.min_order {
        return ValidationOutcome::BelowMinimum {
            minimum: limits.min_order,
            fiat_value: candidate.fiat_value,
        };
    }

    if let Some((window, available)) = limits.periodic_available() {
        if candidate.fiat_value >= available {
            return ValidationOutcome::AbovePeriodicLimit {
                window,
                available,
                fiat_value: candidate.fiat_value,
            };
        }
    }

    if candidate.fiat_value >= limits.max_possible_order {
        return ValidationOutcome::AboveMaximum {
            maximum: limits.max_possible_order,
            fiat_value: candidate.fiat_value,
        };
    }

    ValidationOutcome::Accepted
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::exchange::types::{AccountId, FiatCurrency, PeriodicWindow};

    fn candidate(balance: Decimal, volume: Decimal, fiat_value: Decimal) -> OrderCandidate {
        OrderCandidate::new(
            volume,
            fiat_value,
            balance,
            AccountId::parse("account-1").unwrap(),
        )
        .unwrap()
    }

    fn limits(
        min: Decimal,
        max: Decimal,
        daily: Option<Decimal>,
        annual: Option<Decimal>,
    ) -> TradeLimits {
        TradeLimits::new(FiatCurrency::parse("EUR").unwrap(), min, max, daily, annual).unwrap()
    }

    #[test]
    fn insufficient_balance_wins_over_every_other_rule() {
        let outcome = validate(
            &candidate(dec!(0.5), dec!(1.0), dec!(0.01)),
            &limits(dec!(10), dec!(20), Some(dec!(0)), None),
        );
        assert_eq!(
            outcome,
            ValidationOutcome::InsufficientBalance {
                balance: dec!(0.5),
                volume: dec!(1.0),
            }
        );
    }

    #[test]
    fn below_minimum() {
        let outcome = validate(
            &candidate(dec!(10), dec!(1), dec!(5)),
            &limits(dec!(10), dec!(10000), None, None),
        );
        assert_eq!(
            outcome,
            ValidationOutcome::BelowMinimum {
                minimum: dec!(10),
                fiat_value: dec!(5),
            }
        );
    }

    #[test]
    fn daily_limit_is_checked_before_maximum() {
        let outcome = validate(
            &candidate(dec!(10), dec!(1), dec!(5000)),
            &limits(dec!(1), dec!(10000), Some(dec!(1000)), None),
        );
        assert_eq!(
            outcome,
            ValidationOutcome::AbovePeriodicLimit {
                window: PeriodicWindow::Daily,
                available: dec!(1000),
                fiat_value: dec!(5000),
            }
        );
    }

    #[test]
    fn annual_limit_applies_when_daily_is_absent() {
        let outcome = validate(
            &candidate(dec!(10), dec!(1), dec!(600)),
            &limits(dec!(1), dec!(10000), None, Some(dec!(500))),
        );
        assert_eq!(outcome.code(), "above_periodic_limit");
        assert!(matches!(
            outcome,
            ValidationOutcome::AbovePeriodicLimit {
                window: PeriodicWindow::Annual,
                ..
            }
        ));
    }

    #[test]
    fn daily_limit_shadows_annual() {
        // Daily has room even though annual would not.
        let outcome = validate(
            &candidate(dec!(10), dec!(1), dec!(600)),
            &limits(dec!(1), dec!(10000), Some(dec!(700)), Some(dec!(500))),
        );
        assert_eq!(outcome, ValidationOutcome::Accepted);
    }

    #[test]
    fn missing_periodic_limits_skip_the_rule_but_not_the_maximum() {
        let outcome = validate(
            &candidate(dec!(10), dec!(1), dec!(999999)),
            &limits(dec!(1), dec!(10000), None, None),
        );
        assert_eq!(
            outcome,
            ValidationOutcome::AboveMaximum {
                maximum: dec!(10000),
                fiat_value: dec!(999999),
            }
        );
    }

    #[test]
    fn zero_periodic_amount_is_a_limit_not_an_absence() {
        let outcome = validate(
            &candidate(dec!(10), dec!(1), dec!(50)),
            &limits(dec!(1), dec!(10000), Some(Decimal::ZERO), None),
        );
        assert_eq!(outcome.code(), "above_periodic_limit");
    }

    #[test]
    fn value_equal_to_minimum_is_accepted() {
        let outcome = validate(
            &candidate(dec!(10), dec!(1), dec!(10.00)),
            &limits(dec!(10), dec!(10000), None, None),
        );
        assert_eq!(outcome, ValidationOutcome::Accepted);
    }

    #[test]
    fn value_equal_to_maximum_is_rejected() {
        let outcome = validate(
            &candidate(dec!(10), dec!(1), dec!(10000)),
            &limits(dec!(1), dec!(10000), None, None),
        );
        assert_eq!(outcome.code(), "above_maximum");
        assert_eq!(outcome.margin(), Some(Decimal::ZERO));
    }

    #[test]
    fn value_equal_to_periodic_amount_is_rejected() {
        let outcome = validate(
            &candidate(dec!(10), dec!(1), dec!(1000)),
            &limits(dec!(1), dec!(10000), Some(dec!(1000)), None),
        );
        assert_eq!(outcome.code(), "above_periodic_limit");
    }

    #[test]
    fn balance_equal_to_volume_is_sufficient() {
        let outcome = validate(
            &candidate(dec!(1.00000000), dec!(1), dec!(50)),
            &limits(dec!(1), dec!(10000), None, None),
        );
        assert_eq!(outcome, ValidationOutcome::Accepted);
    }

    #[test]
    fn comparisons_are_exact_at_sub_cent_precision() {
        // 0.1 + 0.2 style drift would misclassify this with floats.
        let fiat = dec!(0.1) + dec!(0.2);
        let outcome = validate(
            &candidate(dec!(10), dec!(1), fiat),
            &limits(dec!(0.3), dec!(10000), None, None),
        );
        assert_eq!(outcome, ValidationOutcome::Accepted);
    }

    #[test]
    fn repeated_validation_is_idempotent() {
        let candidate = candidate(dec!(3), dec!(2), dec!(250));
        let limits = limits(dec!(20), dec!(1000), Some(dec!(200)), Some(dec!(5000)));

        let first = validate(&candidate, &limits);
        for _ in 0..10 {
            assert_eq!(validate(&candidate, &limits), first);
        }
    }
}
