//! FIFO allocation of a collection across outstanding bills.

use rentbook_shared::types::BillId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CollectionError;
use crate::billing::BillPeriod;

/// A bill that still has an unpaid balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingBill {
    /// Bill identifier.
    pub bill_id: BillId,
    /// Period the bill was raised for.
    pub period: BillPeriod,
    /// Amount still owed.
    pub due: Decimal,
}

/// Part of a collection applied to one bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Bill the amount settles.
    pub bill_id: BillId,
    /// Amount applied.
    pub amount: Decimal,
}

/// Result of allocating a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionAllocation {
    /// Per-bill allocations, oldest bill first.
    pub allocations: Vec<Allocation>,
    /// Amount applied to bills.
    pub applied: Decimal,
    /// Amount left over, held as a tenant advance.
    pub unapplied: Decimal,
}

/// Applies `amount` to the oldest bills first.
///
/// Bills are ordered by period, then by id for bills of the same period.
/// Bills with nothing due are skipped. Whatever remains after every bill is
/// settled is returned as `unapplied`.
///
/// # Errors
///
/// Returns `NonPositiveAmount` if `amount` is zero or negative.
pub fn allocate(
    amount: Decimal,
    bills: &[OutstandingBill],
) -> Result<CollectionAllocation, CollectionError> {
    if amount <= Decimal::ZERO {
        return Err(CollectionError::NonPositiveAmount(amount));
    }

    let mut ordered: Vec<&OutstandingBill> =
        bills.iter().filter(|bill| bill.due > Decimal::ZERO).collect();
    ordered.sort_by_key(|bill| (bill.period, bill.bill_id));

    let mut remaining = amount;
    let mut allocations = Vec::new();
    for bill in ordered {
        if remaining.is_zero() {
            break;
        }
        let applied = remaining.min(bill.due);
        allocations.push(Allocation {
            bill_id: bill.bill_id,
            amount: applied,
        });
        remaining -= applied;
    }

    Ok(CollectionAllocation {
        allocations,
        applied: amount - remaining,
        unapplied: remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn bill(year: i32, month: u32, due: Decimal) -> OutstandingBill {
        OutstandingBill {
            bill_id: BillId::new(),
            period: BillPeriod::new(year, month).unwrap(),
            due,
        }
    }

    #[test]
    fn test_oldest_bill_first() {
        let march = bill(2024, 3, dec!(1000));
        let january = bill(2024, 1, dec!(700));
        let february = bill(2024, 2, dec!(500));

        let result = allocate(dec!(1500), &[march, january, february]).unwrap();
        assert_eq!(result.allocations.len(), 3);
        assert_eq!(result.allocations[0].bill_id, january.bill_id);
        assert_eq!(result.allocations[0].amount, dec!(700));
        assert_eq!(result.allocations[1].bill_id, february.bill_id);
        assert_eq!(result.allocations[1].amount, dec!(500));
        assert_eq!(result.allocations[2].bill_id, march.bill_id);
        assert_eq!(result.allocations[2].amount, dec!(300));
        assert_eq!(result.applied, dec!(1500));
        assert_eq!(result.unapplied, Decimal::ZERO);
    }

    #[test]
    fn test_excess_is_unapplied() {
        let only = bill(2024, 1, dec!(400));
        let result = allocate(dec!(1000), &[only]).unwrap();
        assert_eq!(result.applied, dec!(400));
        assert_eq!(result.unapplied, dec!(600));
    }

    #[test]
    fn test_no_bills_is_all_advance() {
        let result = allocate(dec!(250), &[]).unwrap();
        assert!(result.allocations.is_empty());
        assert_eq!(result.unapplied, dec!(250));
    }

    #[test]
    fn test_stops_when_exhausted() {
        let result = allocate(
            dec!(100),
            &[bill(2024, 1, dec!(100)), bill(2024, 2, dec!(100))],
        )
        .unwrap();
        assert_eq!(result.allocations.len(), 1);
    }

    #[test]
    fn test_same_period_ordered_by_id() {
        let a = bill(2024, 5, dec!(100));
        let b = bill(2024, 5, dec!(100));
        let (first, second) = if a.bill_id < b.bill_id { (a, b) } else { (b, a) };

        let result = allocate(dec!(150), &[second, first]).unwrap();
        assert_eq!(result.allocations[0].bill_id, first.bill_id);
        assert_eq!(result.allocations[0].amount, dec!(100));
        assert_eq!(result.allocations[1].amount, dec!(50));
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(allocate(Decimal::ZERO, &[]).is_err());
        assert!(allocate(dec!(-5), &[]).is_err());
    }

    proptest! {
        #[test]
        fn prop_applied_plus_unapplied_is_amount(
            amount in 1i64..1_000_000i64,
            dues in prop::collection::vec(1i64..100_000i64, 0..8),
        ) {
            let amount = Decimal::new(amount, 2);
            let bills: Vec<OutstandingBill> = dues
                .iter()
                .enumerate()
                .map(|(i, due)| bill(2024, u32::try_from(i % 12).unwrap() + 1, Decimal::new(*due, 2)))
                .collect();

            let result = allocate(amount, &bills).unwrap();
            prop_assert_eq!(result.applied + result.unapplied, amount);
            let allocated: Decimal = result.allocations.iter().map(|a| a.amount).sum();
            prop_assert_eq!(allocated, result.applied);
            for allocation in &result.allocations {
                let due = bills.iter().find(|b| b.bill_id == allocation.bill_id).unwrap().due;
                prop_assert!(allocation.amount <= due);
            }
        }
    }
}
