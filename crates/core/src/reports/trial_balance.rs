//! Trial balance.

use chrono::NaiveDate;
use rentbook_shared::types::HeadId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{HeadType, LedgerBalance};

/// One head's line on the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Head identifier.
    pub head_id: HeadId,
    /// Head code.
    pub code: String,
    /// Head name.
    pub name: String,
    /// Head type.
    pub head_type: HeadType,
    /// Debit column.
    pub debit: Decimal,
    /// Credit column.
    pub credit: Decimal,
}

impl TrialBalanceRow {
    /// Places a head's balance in its debit or credit column.
    #[must_use]
    pub fn from_balance(
        head_id: HeadId,
        code: impl Into<String>,
        name: impl Into<String>,
        head_type: HeadType,
        balance: LedgerBalance,
    ) -> Self {
        let (debit, credit) = balance.columns();
        Self {
            head_id,
            code: code.into(),
            name: name.into(),
            head_type,
            debit,
            credit,
        }
    }
}

/// Trial balance as of a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Date the balances were taken at.
    pub as_of: NaiveDate,
    /// Rows ordered by head code.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of the debit column.
    pub total_debit: Decimal,
    /// Sum of the credit column.
    pub total_credit: Decimal,
    /// Whether both columns agree.
    pub is_balanced: bool,
}

impl TrialBalance {
    /// Totals the rows, dropping heads with a zero balance.
    #[must_use]
    pub fn build(as_of: NaiveDate, rows: Vec<TrialBalanceRow>) -> Self {
        let mut rows: Vec<TrialBalanceRow> = rows
            .into_iter()
            .filter(|row| !(row.debit.is_zero() && row.credit.is_zero()))
            .collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debit: Decimal = rows.iter().map(|row| row.debit).sum();
        let total_credit: Decimal = rows.iter().map(|row| row.credit).sum();

        Self {
            as_of,
            rows,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::DrCr;
    use rust_decimal_macros::dec;

    fn row(code: &str, head_type: HeadType, balance: LedgerBalance) -> TrialBalanceRow {
        TrialBalanceRow::from_balance(HeadId::new(), code, code, head_type, balance)
    }

    #[test]
    fn test_balanced_trial_balance() {
        let as_of = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let tb = TrialBalance::build(
            as_of,
            vec![
                row("4000", HeadType::Revenue, LedgerBalance::opening(DrCr::Cr, dec!(1200))),
                row("1000", HeadType::Asset, LedgerBalance::opening(DrCr::Dr, dec!(1000))),
                row("1100", HeadType::Asset, LedgerBalance::opening(DrCr::Dr, dec!(200))),
                row("1200", HeadType::Asset, LedgerBalance::zero()),
            ],
        );

        assert_eq!(tb.rows.len(), 3);
        assert_eq!(tb.rows[0].code, "1000");
        assert_eq!(tb.total_debit, dec!(1200));
        assert_eq!(tb.total_credit, dec!(1200));
        assert!(tb.is_balanced);
    }

    #[test]
    fn test_contra_balance_lands_in_opposite_column() {
        let r = row("1100", HeadType::Asset, LedgerBalance::opening(DrCr::Cr, dec!(50)));
        assert_eq!(r.debit, Decimal::ZERO);
        assert_eq!(r.credit, dec!(50));
    }

    #[test]
    fn test_unbalanced_detected() {
        let as_of = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let tb = TrialBalance::build(
            as_of,
            vec![row("1000", HeadType::Asset, LedgerBalance::opening(DrCr::Dr, dec!(10)))],
        );
        assert!(!tb.is_balanced);
    }
}
