//! Collection error types.

use rentbook_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while splitting or allocating a collection.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Collection amount is zero or negative.
    #[error("Collection amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// A withholding amount or rate is negative.
    #[error("Withholding cannot be negative: {0}")]
    NegativeWithholding(Decimal),

    /// TDS plus VAT exceed the gross amount.
    #[error("Withholding {withheld} exceeds gross amount {gross}")]
    WithholdingExceedsGross {
        /// Gross amount received.
        gross: Decimal,
        /// TDS plus VAT.
        withheld: Decimal,
    },

    /// Amount has more than two decimal places.
    #[error("Amount {0} has more than 2 decimal places")]
    ExcessPrecision(Decimal),
}

impl CollectionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::NegativeWithholding(_) => "NEGATIVE_WITHHOLDING",
            Self::WithholdingExceedsGross { .. } => "WITHHOLDING_EXCEEDS_GROSS",
            Self::ExcessPrecision(_) => "EXCESS_PRECISION",
        }
    }
}

impl From<CollectionError> for AppError {
    fn from(err: CollectionError) -> Self {
        Self::Validation(err.to_string())
    }
}
