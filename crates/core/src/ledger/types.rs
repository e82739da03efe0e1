//! Ledger domain types for posting lines and documents.

use std::fmt;
use std::str::FromStr;

use rentbook_shared::types::{BillId, CollectionId, HeadId, VoucherId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;

/// Debit/credit tag, stored as the two-character strings `dr` and `cr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrCr {
    /// Debit.
    Dr,
    /// Credit.
    Cr,
}

impl DrCr {
    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dr => "dr",
            Self::Cr => "cr",
        }
    }

    /// Returns the other side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Dr => Self::Cr,
            Self::Cr => Self::Dr,
        }
    }
}

impl fmt::Display for DrCr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrCr {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dr" | "debit" => Ok(Self::Dr),
            "cr" | "credit" => Ok(Self::Cr),
            _ => Err(LedgerError::InvalidDrCr(s.to_string())),
        }
    }
}

/// Classification of a head of account.
///
/// - Asset/Expense heads are debit-normal
/// - Liability/Equity/Revenue heads are credit-normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadType {
    /// Cash, bank, receivables.
    Asset,
    /// Tenant advances, security deposits, taxes payable.
    Liability,
    /// Owner's capital.
    Equity,
    /// Rent and utility revenue.
    Revenue,
    /// Operating expenses.
    Expense,
}

impl HeadType {
    /// Returns the side on which this head normally carries its balance.
    #[must_use]
    pub const fn normal_side(self) -> DrCr {
        match self {
            Self::Asset | Self::Expense => DrCr::Dr,
            Self::Liability | Self::Equity | Self::Revenue => DrCr::Cr,
        }
    }

    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for HeadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeadType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(LedgerError::InvalidHeadType(s.to_string())),
        }
    }
}

/// One side of a journal posting against a head of account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingLine {
    /// The head being posted to.
    pub head_id: HeadId,
    /// Debit or credit.
    pub dr_cr: DrCr,
    /// Positive amount in functional currency.
    pub amount: Decimal,
    /// Optional narration copied onto the journal row.
    pub narration: Option<String>,
}

impl PostingLine {
    /// Creates a debit line.
    #[must_use]
    pub const fn debit(head_id: HeadId, amount: Decimal) -> Self {
        Self {
            head_id,
            dr_cr: DrCr::Dr,
            amount,
            narration: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub const fn credit(head_id: HeadId, amount: Decimal) -> Self {
        Self {
            head_id,
            dr_cr: DrCr::Cr,
            amount,
            narration: None,
        }
    }

    /// Attaches a narration.
    #[must_use]
    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }
}

/// The document a journal row originates from.
///
/// Exactly one of the journal's `bill_id`, `collection_id` and `voucher_id`
/// columns is populated, chosen by this variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum DocumentRef {
    /// A monthly bill.
    Bill(BillId),
    /// A bill collection.
    Collection(CollectionId),
    /// A manual voucher.
    Voucher(VoucherId),
}

impl DocumentRef {
    /// Returns the journal column that references this document.
    #[must_use]
    pub const fn column_name(&self) -> &'static str {
        match self {
            Self::Bill(_) => "bill_id",
            Self::Collection(_) => "collection_id",
            Self::Voucher(_) => "voucher_id",
        }
    }

    /// Returns the raw document id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        match self {
            Self::Bill(id) => id.into_inner(),
            Self::Collection(id) => id.into_inner(),
            Self::Voucher(id) => id.into_inner(),
        }
    }

    /// Splits into the three nullable journal columns.
    #[must_use]
    pub fn columns(&self) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
        match self {
            Self::Bill(id) => (Some(id.into_inner()), None, None),
            Self::Collection(id) => (None, Some(id.into_inner()), None),
            Self::Voucher(id) => (None, None, Some(id.into_inner())),
        }
    }

    /// Rebuilds a reference from the three nullable journal columns.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocumentRef` unless exactly one column is set.
    pub fn from_columns(
        bill_id: Option<Uuid>,
        collection_id: Option<Uuid>,
        voucher_id: Option<Uuid>,
    ) -> Result<Self, LedgerError> {
        match (bill_id, collection_id, voucher_id) {
            (Some(id), None, None) => Ok(Self::Bill(BillId::from_uuid(id))),
            (None, Some(id), None) => Ok(Self::Collection(CollectionId::from_uuid(id))),
            (None, None, Some(id)) => Ok(Self::Voucher(VoucherId::from_uuid(id))),
            _ => Err(LedgerError::InvalidDocumentRef),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bill(id) => write!(f, "bill:{id}"),
            Self::Collection(id) => write!(f, "collection:{id}"),
            Self::Voucher(id) => write!(f, "voucher:{id}"),
        }
    }
}

/// Debit and credit totals of a set of posting lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostingTotals {
    /// Sum of debit lines.
    pub debit: Decimal,
    /// Sum of credit lines.
    pub credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl PostingTotals {
    /// Sums the debit and credit sides of the given lines.
    #[must_use]
    pub fn from_lines(lines: &[PostingLine]) -> Self {
        let (debit, credit) = lines
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(dr, cr), line| match line.dr_cr {
                DrCr::Dr => (dr + line.amount, cr),
                DrCr::Cr => (dr, cr + line.amount),
            });

        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_dr_cr_round_trip_through_str() {
        assert_eq!("dr".parse::<DrCr>().unwrap(), DrCr::Dr);
        assert_eq!("CR".parse::<DrCr>().unwrap(), DrCr::Cr);
        assert_eq!("debit".parse::<DrCr>().unwrap(), DrCr::Dr);
        assert!("xx".parse::<DrCr>().is_err());
        assert_eq!(DrCr::Dr.to_string(), "dr");
    }

    #[test]
    fn test_dr_cr_opposite() {
        assert_eq!(DrCr::Dr.opposite(), DrCr::Cr);
        assert_eq!(DrCr::Cr.opposite(), DrCr::Dr);
    }

    #[test]
    fn test_head_type_normal_side() {
        assert_eq!(HeadType::Asset.normal_side(), DrCr::Dr);
        assert_eq!(HeadType::Expense.normal_side(), DrCr::Dr);
        assert_eq!(HeadType::Liability.normal_side(), DrCr::Cr);
        assert_eq!(HeadType::Equity.normal_side(), DrCr::Cr);
        assert_eq!(HeadType::Revenue.normal_side(), DrCr::Cr);
    }

    #[test]
    fn test_head_type_from_str_case_insensitive() {
        assert_eq!("Revenue".parse::<HeadType>().unwrap(), HeadType::Revenue);
        assert!("income".parse::<HeadType>().is_err());
    }

    #[test]
    fn test_document_ref_columns() {
        let bill = BillId::new();
        let doc = DocumentRef::Bill(bill);
        assert_eq!(doc.column_name(), "bill_id");
        assert_eq!(doc.columns(), (Some(bill.into_inner()), None, None));

        let (b, c, v) = doc.columns();
        assert_eq!(DocumentRef::from_columns(b, c, v).unwrap(), doc);
    }

    #[test]
    fn test_document_ref_requires_exactly_one_column() {
        let id = Uuid::new_v4();
        assert!(matches!(
            DocumentRef::from_columns(None, None, None),
            Err(LedgerError::InvalidDocumentRef)
        ));
        assert!(matches!(
            DocumentRef::from_columns(Some(id), Some(id), None),
            Err(LedgerError::InvalidDocumentRef)
        ));
    }

    #[test]
    fn test_document_ref_serializes_tagged() {
        let id = VoucherId::new();
        let json = serde_json::to_value(DocumentRef::Voucher(id)).unwrap();
        assert_eq!(json["kind"], "voucher");
        assert_eq!(json["id"], id.to_string());
    }

    #[test]
    fn test_posting_totals() {
        let head = HeadId::new();
        let lines = vec![
            PostingLine::debit(head, dec!(100)),
            PostingLine::credit(head, dec!(60)),
            PostingLine::credit(head, dec!(40)),
        ];
        let totals = PostingTotals::from_lines(&lines);
        assert_eq!(totals.debit, dec!(100));
        assert_eq!(totals.credit, dec!(100));
        assert!(totals.is_balanced);
    }
}
