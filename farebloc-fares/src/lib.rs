pub mod hold;
pub mod rules;

pub use hold::{HoldBookingPolicy, HoldPolicyError, HoldUnit};
pub use rules::{CancellationQuote, FareRule, FareRuleEngine, FareRuleError};
