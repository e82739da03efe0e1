//! Tenant statement of account.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What produced a statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementEntryKind {
    /// A bill was raised.
    Bill,
    /// A collection was received.
    Collection,
    /// A bill was voided.
    Void,
}

impl StatementEntryKind {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bill => "bill",
            Self::Collection => "collection",
            Self::Void => "void",
        }
    }

    /// Parses the storage representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bill" => Some(Self::Bill),
            "collection" => Some(Self::Collection),
            "void" => Some(Self::Void),
            _ => None,
        }
    }
}

/// One movement on a tenant's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Date of the movement.
    pub date: NaiveDate,
    /// What produced it.
    pub kind: StatementEntryKind,
    /// Bill or collection id.
    pub document_id: Uuid,
    /// Narration.
    pub description: String,
    /// Amount the tenant was charged.
    pub debit: Decimal,
    /// Amount settled.
    pub credit: Decimal,
    /// Amount owed after this line, filled in by [`TenantStatement::build`].
    #[serde(default)]
    pub balance: Decimal,
}

/// A tenant's movements over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantStatement {
    /// Amount owed before the first line.
    pub opening_balance: Decimal,
    /// Movements in date order with running balances.
    pub lines: Vec<StatementLine>,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Amount owed after the last line. Negative means the tenant is in advance.
    pub closing_balance: Decimal,
}

impl TenantStatement {
    /// Computes running balances; debits raise what the tenant owes.
    ///
    /// Lines keep their given order.
    #[must_use]
    pub fn build(opening_balance: Decimal, lines: Vec<StatementLine>) -> Self {
        let mut running = opening_balance;
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        let lines = lines
            .into_iter()
            .map(|mut line| {
                running += line.debit - line.credit;
                total_debit += line.debit;
                total_credit += line.credit;
                line.balance = running;
                line
            })
            .collect();

        Self {
            opening_balance,
            lines,
            total_debit,
            total_credit,
            closing_balance: running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(day: u32, kind: StatementEntryKind, debit: Decimal, credit: Decimal) -> StatementLine {
        StatementLine {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            kind,
            document_id: Uuid::new_v4(),
            description: kind.as_str().to_string(),
            debit,
            credit,
            balance: Decimal::ZERO,
        }
    }

    #[test]
    fn test_running_balance() {
        let statement = TenantStatement::build(
            dec!(500),
            vec![
                line(1, StatementEntryKind::Bill, dec!(1000), Decimal::ZERO),
                line(5, StatementEntryKind::Collection, Decimal::ZERO, dec!(1200)),
                line(9, StatementEntryKind::Bill, dec!(300), Decimal::ZERO),
            ],
        );

        let balances: Vec<Decimal> = statement.lines.iter().map(|l| l.balance).collect();
        assert_eq!(balances, vec![dec!(1500), dec!(300), dec!(600)]);
        assert_eq!(statement.total_debit, dec!(1300));
        assert_eq!(statement.total_credit, dec!(1200));
        assert_eq!(statement.closing_balance, dec!(600));
    }

    #[test]
    fn test_advance_goes_negative() {
        let statement = TenantStatement::build(
            Decimal::ZERO,
            vec![line(2, StatementEntryKind::Collection, Decimal::ZERO, dec!(100))],
        );
        assert_eq!(statement.closing_balance, dec!(-100));
    }

    #[test]
    fn test_empty_statement() {
        let statement = TenantStatement::build(dec!(42), Vec::new());
        assert_eq!(statement.closing_balance, dec!(42));
        assert!(statement.lines.is_empty());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(StatementEntryKind::parse("void"), Some(StatementEntryKind::Void));
        assert_eq!(StatementEntryKind::parse("refund"), None);
    }
}
