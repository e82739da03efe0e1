//! Core business logic for Rentbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Double-entry posting rules and running balances
//! - `billing` - Bill periods, particulars, meter charges and allocations
//! - `collection` - Withholding splits and allocation of collections to bills
//! - `reports` - Trial balance and tenant statements

pub mod billing;
pub mod collection;
pub mod ledger;
pub mod reports;

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to two decimal places using banker's rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_bankers() {
        assert_eq!(round_money(dec!(10.125)), dec!(10.12));
        assert_eq!(round_money(dec!(10.135)), dec!(10.14));
        assert_eq!(round_money(dec!(10.1)), dec!(10.10));
    }
}
