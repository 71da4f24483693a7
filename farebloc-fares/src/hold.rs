use serde::{Deserialize, Serialize};

/// Hard bounds on the hold cutoff window, in days before departure.
pub const HOLD_CUTOFF_MIN_DAYS: i32 = 1;
pub const HOLD_CUTOFF_MAX_DAYS: i32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HoldPolicyError {
    #[error("Hold percentage must be between 0 and 100, got {amount}")]
    PercentageOutOfRange { amount: i32 },

    #[error("Flat hold amount {amount} must be between 0 and the per-seat price {price_per_seat}")]
    FlatAmountOutOfRange { amount: i32, price_per_seat: i32 },

    #[error("Hold cutoff must be between 1 and 30 days, got {days}")]
    CutoffOutOfRange { days: i32 },

    #[error("Hold limit of {limit_hours} hour(s) exceeds the {max_hours} hour(s) a {cutoff_days}-day cutoff allows")]
    LimitOutOfRange {
        limit_hours: i32,
        max_hours: i32,
        cutoff_days: i32,
    },
}

/// How a hold deposit is expressed, with its wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoldUnit {
    #[serde(rename = "P")]
    Percentage,
    #[serde(rename = "F")]
    Flat,
}

/// Optional "book now, pay later" policy on a series. All four fields are
/// required once holds are enabled; disabling the policy drops the whole
/// value, there is no partially-configured state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldBookingPolicy {
    pub unit: HoldUnit,
    pub amount: i32,
    pub cutoff_days: i32,
    pub limit_hours: i32,
}

impl HoldBookingPolicy {
    /// Validates the policy against the current per-seat price. The flat
    /// amount bound is relative to the price and the hour limit is relative
    /// to the cutoff, so callers re-run this whenever either changes.
    pub fn validate(&self, price_per_seat: i32) -> Result<(), HoldPolicyError> {
        match self.unit {
            HoldUnit::Percentage => {
                if self.amount < 0 || self.amount > 100 {
                    return Err(HoldPolicyError::PercentageOutOfRange {
                        amount: self.amount,
                    });
                }
            }
            HoldUnit::Flat => {
                if self.amount < 0 || self.amount > price_per_seat {
                    return Err(HoldPolicyError::FlatAmountOutOfRange {
                        amount: self.amount,
                        price_per_seat,
                    });
                }
            }
        }
        if self.cutoff_days < HOLD_CUTOFF_MIN_DAYS || self.cutoff_days > HOLD_CUTOFF_MAX_DAYS {
            return Err(HoldPolicyError::CutoffOutOfRange {
                days: self.cutoff_days,
            });
        }
        let max_hours = self.cutoff_days * 24;
        if self.limit_hours < 0 || self.limit_hours > max_hours {
            return Err(HoldPolicyError::LimitOutOfRange {
                limit_hours: self.limit_hours,
                max_hours,
                cutoff_days: self.cutoff_days,
            });
        }
        Ok(())
    }

    /// The deposit due when a hold is taken at the given per-seat price.
    pub fn deposit_for(&self, price_per_seat: i32) -> i32 {
        match self.unit {
            HoldUnit::Percentage => {
                (i64::from(price_per_seat) * i64::from(self.amount) / 100) as i32
            }
            HoldUnit::Flat => self.amount,
        }
    }
}
