//! Bill particulars and bill totals.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BillingError;
use super::types::ParticularKind;

/// A staged line item waiting to be committed into a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftParticular {
    /// Kind of charge.
    pub kind: ParticularKind,
    /// Charge amount.
    pub amount: Decimal,
    /// Free-text description printed on the bill.
    pub description: Option<String>,
}

impl DraftParticular {
    /// Creates a particular without a description.
    #[must_use]
    pub const fn new(kind: ParticularKind, amount: Decimal) -> Self {
        Self {
            kind,
            amount,
            description: None,
        }
    }
}

/// Totals of a bill, per particular kind and overall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSummary {
    /// Amount per kind, in bill order. Kinds without charges are absent.
    pub by_kind: BTreeMap<ParticularKind, Decimal>,
    /// Grand total.
    pub total: Decimal,
}

impl BillSummary {
    /// Totals a set of particulars.
    ///
    /// # Errors
    ///
    /// Returns `NoParticulars` for an empty set, `NonPositiveParticular`
    /// for a zero or negative amount and `ExcessPrecision` for amounts
    /// beyond 2 dp.
    pub fn from_particulars(particulars: &[DraftParticular]) -> Result<Self, BillingError> {
        if particulars.is_empty() {
            return Err(BillingError::NoParticulars);
        }

        let mut by_kind = BTreeMap::new();
        for particular in particulars {
            if particular.amount <= Decimal::ZERO {
                return Err(BillingError::NonPositiveParticular(particular.kind));
            }
            if particular.amount.normalize().scale() > 2 {
                return Err(BillingError::ExcessPrecision(particular.amount));
            }
            *by_kind.entry(particular.kind).or_insert(Decimal::ZERO) += particular.amount;
        }

        let total = by_kind.values().copied().sum();
        Ok(Self { by_kind, total })
    }

    /// Amount charged for one kind, zero when absent.
    #[must_use]
    pub fn amount_for(&self, kind: ParticularKind) -> Decimal {
        self.by_kind.get(&kind).copied().unwrap_or(Decimal::ZERO)
    }
}
