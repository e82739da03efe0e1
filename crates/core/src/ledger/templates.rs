//! Posting templates for bills and collections.
//!
//! Each template turns a business document into balanced posting lines
//! against the system heads resolved into [`PostingHeads`].

use rentbook_shared::types::HeadId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use super::types::PostingLine;
use super::validation::validate_lines;
use crate::billing::{BillSummary, ParticularKind};
use crate::collection::WithholdingSplit;

/// Where the net amount of a collection is deposited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositAccount {
    /// Cash in hand.
    Cash,
    /// Bank account.
    Bank,
}

impl DepositAccount {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
        }
    }
}

/// The heads that bill and collection postings are routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingHeads {
    /// Tenant receivables.
    pub receivable: HeadId,
    /// Cash in hand.
    pub cash: HeadId,
    /// Bank account.
    pub bank: HeadId,
    /// Tax deducted at source by tenants, recoverable.
    pub tds_receivable: HeadId,
    /// VAT withheld by tenants, recoverable.
    pub vat_receivable: HeadId,
    /// Rent revenue.
    pub rent_revenue: HeadId,
    /// Electricity revenue.
    pub electricity_revenue: HeadId,
    /// Gas revenue.
    pub gas_revenue: HeadId,
    /// WASA revenue.
    pub wasa_revenue: HeadId,
    /// Internet revenue.
    pub internet_revenue: HeadId,
    /// Money received ahead of billing.
    pub advance_from_tenants: HeadId,
}

impl PostingHeads {
    /// Returns the revenue head for a particular kind.
    #[must_use]
    pub const fn revenue_for(&self, kind: ParticularKind) -> HeadId {
        match kind {
            ParticularKind::Rent => self.rent_revenue,
            ParticularKind::Electricity => self.electricity_revenue,
            ParticularKind::Gas => self.gas_revenue,
            ParticularKind::Wasa => self.wasa_revenue,
            ParticularKind::Internet => self.internet_revenue,
        }
    }

    /// Returns the head a collection's net amount is debited to.
    #[must_use]
    pub const fn deposit_head(&self, deposit: DepositAccount) -> HeadId {
        match deposit {
            DepositAccount::Cash => self.cash,
            DepositAccount::Bank => self.bank,
        }
    }
}

/// Lines for raising a bill: debit receivable for the total, credit the
/// revenue head of each kind.
#[must_use]
pub fn bill_lines(heads: &PostingHeads, summary: &BillSummary) -> Vec<PostingLine> {
    let mut lines = Vec::with_capacity(summary.by_kind.len() + 1);
    lines.push(PostingLine::debit(heads.receivable, summary.total).with_narration("bill raised"));
    for (kind, amount) in &summary.by_kind {
        lines.push(
            PostingLine::credit(heads.revenue_for(*kind), *amount)
                .with_narration(format!("{kind} charge")),
        );
    }
    lines
}

/// Lines for a collection.
///
/// Debits the deposit head with the net received and the withholding heads
/// with TDS and VAT; credits receivable with the `applied` part of the gross
/// and tenant advances with the rest. Zero-amount lines are left out.
///
/// # Errors
///
/// Returns `Unbalanced` if `applied` exceeds the gross, or whatever
/// [`validate_lines`] rejects.
pub fn collection_lines(
    heads: &PostingHeads,
    deposit: DepositAccount,
    split: &WithholdingSplit,
    applied: Decimal,
) -> Result<Vec<PostingLine>, LedgerError> {
    if applied < Decimal::ZERO || applied > split.gross {
        return Err(LedgerError::Unbalanced {
            debit: split.gross,
            credit: applied,
        });
    }
    let unapplied = split.gross - applied;

    let candidates = [
        PostingLine::debit(heads.deposit_head(deposit), split.net).with_narration("collection received"),
        PostingLine::debit(heads.tds_receivable, split.tds).with_narration("tds withheld"),
        PostingLine::debit(heads.vat_receivable, split.vat).with_narration("vat withheld"),
        PostingLine::credit(heads.receivable, applied).with_narration("applied to bills"),
        PostingLine::credit(heads.advance_from_tenants, unapplied).with_narration("tenant advance"),
    ];
    let lines: Vec<PostingLine> = candidates
        .into_iter()
        .filter(|line| !line.amount.is_zero())
        .collect();

    validate_lines(&lines)?;
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::DraftParticular;
    use crate::ledger::types::{DrCr, PostingTotals};
    use rust_decimal_macros::dec;

    fn heads() -> PostingHeads {
        PostingHeads {
            receivable: HeadId::new(),
            cash: HeadId::new(),
            bank: HeadId::new(),
            tds_receivable: HeadId::new(),
            vat_receivable: HeadId::new(),
            rent_revenue: HeadId::new(),
            electricity_revenue: HeadId::new(),
            gas_revenue: HeadId::new(),
            wasa_revenue: HeadId::new(),
            internet_revenue: HeadId::new(),
            advance_from_tenants: HeadId::new(),
        }
    }

    #[test]
    fn test_bill_lines_balance() {
        let heads = heads();
        let summary = BillSummary::from_particulars(&[
            DraftParticular::new(ParticularKind::Rent, dec!(10000)),
            DraftParticular::new(ParticularKind::Gas, dec!(800)),
            DraftParticular::new(ParticularKind::Gas, dec!(200)),
        ])
        .unwrap();

        let lines = bill_lines(&heads, &summary);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].head_id, heads.receivable);
        assert_eq!(lines[0].dr_cr, DrCr::Dr);
        assert_eq!(lines[0].amount, dec!(11000));
        assert_eq!(lines[2].head_id, heads.gas_revenue);
        assert_eq!(lines[2].amount, dec!(1000));
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_collection_lines_with_withholding() {
        let heads = heads();
        let split = WithholdingSplit::from_amounts(dec!(10000), dec!(500), dec!(1500)).unwrap();

        let lines = collection_lines(&heads, DepositAccount::Bank, &split, dec!(10000)).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].head_id, heads.bank);
        assert_eq!(lines[0].amount, dec!(8000));
        assert_eq!(lines[3].head_id, heads.receivable);
        assert_eq!(lines[3].dr_cr, DrCr::Cr);
        assert!(PostingTotals::from_lines(&lines).is_balanced);
    }

    #[test]
    fn test_collection_lines_omit_zero_withholding() {
        let heads = heads();
        let split = WithholdingSplit::from_amounts(dec!(3000), dec!(0), dec!(0)).unwrap();

        let lines = collection_lines(&heads, DepositAccount::Cash, &split, dec!(3000)).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_collection_excess_goes_to_advance() {
        let heads = heads();
        let split = WithholdingSplit::from_amounts(dec!(5000), dec!(0), dec!(0)).unwrap();

        let lines = collection_lines(&heads, DepositAccount::Cash, &split, dec!(3500)).unwrap();
        let advance = lines
            .iter()
            .find(|l| l.head_id == heads.advance_from_tenants)
            .unwrap();
        assert_eq!(advance.dr_cr, DrCr::Cr);
        assert_eq!(advance.amount, dec!(1500));
    }

    #[test]
    fn test_collection_applied_above_gross_rejected() {
        let heads = heads();
        let split = WithholdingSplit::from_amounts(dec!(100), dec!(0), dec!(0)).unwrap();
        assert!(collection_lines(&heads, DepositAccount::Cash, &split, dec!(101)).is_err());
    }
}
