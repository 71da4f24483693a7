use chrono::NaiveDate;
use farebloc_core::time::days_until;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FareRuleError {
    #[error("Days before departure must be positive, got {days_before_departure}")]
    NonPositiveThreshold { days_before_departure: i32 },

    #[error("Threshold of {days_before_departure} day(s) exceeds the {days_remaining} day(s) left before departure")]
    ExceedsDeparture {
        days_before_departure: i32,
        days_remaining: i64,
    },

    #[error("Refundable amount must not be negative, got {refundable_amount}")]
    NegativeAmount { refundable_amount: i32 },

    #[error("Refundable amount {refundable_amount} exceeds the per-seat price {price_per_seat}")]
    ExceedsPrice {
        refundable_amount: i32,
        price_per_seat: i32,
    },
}

/// One refund tier: cancel at least this many days out, get this much back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareRule {
    pub days_before_departure: i32,
    pub refundable_amount: i32,
}

/// What a cancellation is worth right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationQuote {
    pub eligible: bool,
    pub refundable_amount: i32,
    pub applied_rule: Option<FareRule>,
}

impl CancellationQuote {
    fn ineligible() -> Self {
        Self {
            eligible: false,
            refundable_amount: 0,
            applied_rule: None,
        }
    }
}

/// Authoring-time validation and cancellation-time resolution of refund tiers.
pub struct FareRuleEngine;

impl FareRuleEngine {
    /// Checks one candidate tier against the current price and flight date.
    /// Both bounds are relative, so every rule is checked again whenever
    /// either input changes.
    pub fn validate_rule(
        rule: &FareRule,
        price_per_seat: i32,
        flight_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), FareRuleError> {
        if rule.days_before_departure <= 0 {
            return Err(FareRuleError::NonPositiveThreshold {
                days_before_departure: rule.days_before_departure,
            });
        }
        let days_remaining = days_until(flight_date, today);
        if i64::from(rule.days_before_departure) > days_remaining {
            return Err(FareRuleError::ExceedsDeparture {
                days_before_departure: rule.days_before_departure,
                days_remaining,
            });
        }
        if rule.refundable_amount < 0 {
            return Err(FareRuleError::NegativeAmount {
                refundable_amount: rule.refundable_amount,
            });
        }
        if rule.refundable_amount > price_per_seat {
            return Err(FareRuleError::ExceedsPrice {
                refundable_amount: rule.refundable_amount,
                price_per_seat,
            });
        }
        Ok(())
    }

    /// Re-checks an authored rule set, returning each failing rule's index.
    pub fn revalidate(
        rules: &[FareRule],
        price_per_seat: i32,
        flight_date: NaiveDate,
        today: NaiveDate,
    ) -> Vec<(usize, FareRuleError)> {
        rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| {
                Self::validate_rule(rule, price_per_seat, flight_date, today)
                    .err()
                    .map(|error| (index, error))
            })
            .collect()
    }

    /// The tightest applicable tier: the rule with the largest threshold that
    /// is still within the days remaining. Among equal thresholds the rule
    /// authored first wins.
    pub fn resolve_applicable(rules: &[FareRule], days_until_departure: i64) -> Option<&FareRule> {
        let mut best: Option<&FareRule> = None;
        for rule in rules {
            if i64::from(rule.days_before_departure) > days_until_departure {
                continue;
            }
            match best {
                Some(current) if current.days_before_departure >= rule.days_before_departure => {}
                _ => best = Some(rule),
            }
        }
        best
    }

    /// Cancellation eligibility and refund. A series that is not refundable,
    /// or one with no tier left to apply, yields a zero quote.
    pub fn cancellation_quote(
        is_refundable: bool,
        rules: &[FareRule],
        days_until_departure: i64,
    ) -> CancellationQuote {
        if !is_refundable {
            return CancellationQuote::ineligible();
        }
        match Self::resolve_applicable(rules, days_until_departure) {
            Some(rule) => CancellationQuote {
                eligible: true,
                refundable_amount: rule.refundable_amount,
                applied_rule: Some(*rule),
            },
            None => CancellationQuote::ineligible(),
        }
    }
}
