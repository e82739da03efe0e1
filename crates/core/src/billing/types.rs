//! Bill particular kinds and bill status.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BillingError;

/// One line item kind composing a monthly bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticularKind {
    /// Shop rent.
    Rent,
    /// Electricity charge.
    Electricity,
    /// Gas charge.
    Gas,
    /// Water and sewerage (WASA) charge.
    Wasa,
    /// Internet charge.
    Internet,
}

impl ParticularKind {
    /// All kinds in bill order.
    pub const ALL: [Self; 5] = [
        Self::Rent,
        Self::Electricity,
        Self::Gas,
        Self::Wasa,
        Self::Internet,
    ];

    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Electricity => "electricity",
            Self::Gas => "gas",
            Self::Wasa => "wasa",
            Self::Internet => "internet",
        }
    }

    /// Returns true for charges measured by a meter.
    #[must_use]
    pub const fn is_metered(self) -> bool {
        matches!(self, Self::Electricity | Self::Gas | Self::Wasa)
    }
}

impl fmt::Display for ParticularKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticularKind {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BillingError::UnknownParticularKind(s.to_string()))
    }
}

/// Payment status of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// Nothing collected yet.
    Unpaid,
    /// Some but not all of the total collected.
    PartiallyPaid,
    /// Fully collected.
    Paid,
    /// Cancelled and reversed in the ledger.
    Void,
}

impl BillStatus {
    /// Derives the status of a live bill from its total and collected amount.
    #[must_use]
    pub fn from_amounts(total: Decimal, paid: Decimal) -> Self {
        if paid <= Decimal::ZERO {
            Self::Unpaid
        } else if paid < total {
            Self::PartiallyPaid
        } else {
            Self::Paid
        }
    }

    /// Returns true if collections may still be applied.
    #[must_use]
    pub const fn accepts_collection(self) -> bool {
        matches!(self, Self::Unpaid | Self::PartiallyPaid)
    }

    /// Returns the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Void => "void",
        }
    }
}

impl FromStr for BillStatus {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "partially_paid" => Ok(Self::PartiallyPaid),
            "paid" => Ok(Self::Paid),
            "void" => Ok(Self::Void),
            _ => Err(BillingError::UnknownStatus(s.to_string())),
        }
    }
}
