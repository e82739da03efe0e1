//! Running balances per head of account.
//!
//! A head's balance is stored unsigned together with a dr/cr tag, the way
//! `ledger_current` and `ledger_history` rows hold it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{DrCr, HeadType};

/// Unsigned running balance with its debit/credit side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBalance {
    /// Balance amount, never negative.
    pub amount: Decimal,
    /// Side the balance sits on.
    pub dr_cr: DrCr,
}

impl Default for LedgerBalance {
    fn default() -> Self {
        Self::zero()
    }
}

impl LedgerBalance {
    /// A zero debit balance, used for heads that were never posted to.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            amount: Decimal::ZERO,
            dr_cr: DrCr::Dr,
        }
    }

    /// The balance of a head whose first posting is `amount` on `dr_cr`.
    #[must_use]
    pub const fn opening(dr_cr: DrCr, amount: Decimal) -> Self {
        Self { amount, dr_cr }
    }

    /// Applies a posting to this balance.
    ///
    /// Same side: amounts add. Opposite side: the posting is subtracted, and
    /// when it exceeds the balance the side flips to the posting's side. A
    /// result of exactly zero keeps the existing side.
    #[must_use]
    pub fn apply(self, dr_cr: DrCr, amount: Decimal) -> Self {
        if self.dr_cr == dr_cr {
            return Self {
                amount: self.amount + amount,
                dr_cr,
            };
        }

        let remaining = self.amount - amount;
        if remaining < Decimal::ZERO {
            Self {
                amount: -remaining,
                dr_cr,
            }
        } else {
            Self {
                amount: remaining,
                dr_cr: self.dr_cr,
            }
        }
    }

    /// Returns the balance as a signed amount (debit positive).
    #[must_use]
    pub fn signed(&self) -> Decimal {
        match self.dr_cr {
            DrCr::Dr => self.amount,
            DrCr::Cr => -self.amount,
        }
    }

    /// Builds a balance from a signed amount (debit positive).
    #[must_use]
    pub fn from_signed(value: Decimal) -> Self {
        if value < Decimal::ZERO {
            Self {
                amount: -value,
                dr_cr: DrCr::Cr,
            }
        } else {
            Self {
                amount: value,
                dr_cr: DrCr::Dr,
            }
        }
    }

    /// Returns the balance in the head's normal direction.
    ///
    /// Negative when the head carries a contra balance (e.g. a receivable
    /// in credit after an advance).
    #[must_use]
    pub fn normal_balance(&self, head_type: HeadType) -> Decimal {
        if self.dr_cr == head_type.normal_side() {
            self.amount
        } else {
            -self.amount
        }
    }

    /// Splits the balance into trial-balance `(debit, credit)` columns.
    #[must_use]
    pub fn columns(&self) -> (Decimal, Decimal) {
        match self.dr_cr {
            DrCr::Dr => (self.amount, Decimal::ZERO),
            DrCr::Cr => (Decimal::ZERO, self.amount),
        }
    }

    /// Returns true if the balance is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn side_strategy() -> impl Strategy<Value = DrCr> {
        prop_oneof![Just(DrCr::Dr), Just(DrCr::Cr)]
    }

    fn sign(dr_cr: DrCr) -> Decimal {
        match dr_cr {
            DrCr::Dr => Decimal::ONE,
            DrCr::Cr => Decimal::NEGATIVE_ONE,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Applying a posting moves the signed balance by exactly the signed amount.
        #[test]
        fn prop_apply_matches_signed_arithmetic(
            start_side in side_strategy(),
            start in amount_strategy(),
            side in side_strategy(),
            amount in amount_strategy(),
        ) {
            let before = LedgerBalance::opening(start_side, start);
            let after = before.apply(side, amount);
            prop_assert_eq!(after.signed(), before.signed() + sign(side) * amount);
        }

        /// The stored amount never goes negative.
        #[test]
        fn prop_amount_never_negative(
            postings in prop::collection::vec((side_strategy(), amount_strategy()), 1..30),
        ) {
            let mut balance = LedgerBalance::zero();
            for (side, amount) in postings {
                balance = balance.apply(side, amount);
                prop_assert!(balance.amount >= Decimal::ZERO);
            }
        }

        /// Sequential application equals the signed sum of all postings.
        #[test]
        fn prop_sequence_equals_signed_sum(
            postings in prop::collection::vec((side_strategy(), amount_strategy()), 1..30),
        ) {
            let balance = postings
                .iter()
                .fold(LedgerBalance::zero(), |b, (side, amount)| b.apply(*side, *amount));
            let expected: Decimal = postings.iter().map(|(s, a)| sign(*s) * *a).sum();
            prop_assert_eq!(balance.signed(), expected);
        }

        /// A posting followed by its reversal restores the signed balance.
        #[test]
        fn prop_reversal_restores_balance(
            start_side in side_strategy(),
            start in amount_strategy(),
            side in side_strategy(),
            amount in amount_strategy(),
        ) {
            let before = LedgerBalance::opening(start_side, start);
            let after = before.apply(side, amount).apply(side.opposite(), amount);
            prop_assert_eq!(after.signed(), before.signed());
        }

        #[test]
        fn prop_signed_round_trip(value in -10_000_000i64..10_000_000i64) {
            let value = Decimal::new(value, 2);
            prop_assert_eq!(LedgerBalance::from_signed(value).signed(), value);
        }
    }

    #[test]
    fn test_same_side_adds() {
        let balance = LedgerBalance::opening(DrCr::Dr, dec!(100)).apply(DrCr::Dr, dec!(50));
        assert_eq!(balance, LedgerBalance::opening(DrCr::Dr, dec!(150)));
    }

    #[test]
    fn test_opposite_side_subtracts() {
        let balance = LedgerBalance::opening(DrCr::Dr, dec!(100)).apply(DrCr::Cr, dec!(30));
        assert_eq!(balance, LedgerBalance::opening(DrCr::Dr, dec!(70)));
    }

    #[test]
    fn test_overshoot_flips_side() {
        let balance = LedgerBalance::opening(DrCr::Dr, dec!(100)).apply(DrCr::Cr, dec!(130));
        assert_eq!(balance, LedgerBalance::opening(DrCr::Cr, dec!(30)));
    }

    #[test]
    fn test_exact_settlement_keeps_side() {
        let balance = LedgerBalance::opening(DrCr::Cr, dec!(100)).apply(DrCr::Dr, dec!(100));
        assert_eq!(balance.dr_cr, DrCr::Cr);
        assert!(balance.is_zero());
    }

    #[test]
    fn test_first_posting_on_zero_takes_posting_side() {
        let balance = LedgerBalance::zero().apply(DrCr::Cr, dec!(25));
        assert_eq!(balance, LedgerBalance::opening(DrCr::Cr, dec!(25)));
    }

    #[test]
    fn test_normal_balance() {
        let receivable = LedgerBalance::opening(DrCr::Dr, dec!(500));
        assert_eq!(receivable.normal_balance(HeadType::Asset), dec!(500));
        assert_eq!(receivable.normal_balance(HeadType::Revenue), dec!(-500));
    }

    #[test]
    fn test_columns() {
        assert_eq!(
            LedgerBalance::opening(DrCr::Dr, dec!(10)).columns(),
            (dec!(10), Decimal::ZERO)
        );
        assert_eq!(
            LedgerBalance::opening(DrCr::Cr, dec!(10)).columns(),
            (Decimal::ZERO, dec!(10))
        );
    }
}
