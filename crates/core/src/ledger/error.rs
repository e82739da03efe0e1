//! Ledger error types for posting validation.

use rentbook_shared::{AppError, types::HeadId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while validating or applying postings.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// A posting must have at least two lines.
    #[error("Posting must have at least 2 lines")]
    InsufficientLines,

    /// A posting line amount is zero or negative.
    #[error("Posting amount for head {0} must be positive")]
    NonPositiveAmount(HeadId),

    /// A posting line carries more than two decimal places.
    #[error("Amount {0} has more than 2 decimal places")]
    ExcessPrecision(Decimal),

    /// A posting only debits or only credits.
    #[error("Posting must have both debit and credit lines")]
    SingleSided,

    /// Debits and credits do not balance.
    #[error("Posting is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Head Errors ==========
    /// Head of account not found.
    #[error("Head of account not found: {0}")]
    HeadNotFound(HeadId),

    /// Head of account is inactive.
    #[error("Head of account {0} is inactive")]
    HeadInactive(HeadId),

    // ========== Parse Errors ==========
    /// Unknown debit/credit tag.
    #[error("Invalid dr/cr tag: {0}")]
    InvalidDrCr(String),

    /// Unknown head type.
    #[error("Invalid head type: {0}")]
    InvalidHeadType(String),

    /// Journal row does not reference exactly one document.
    #[error("Journal row must reference exactly one document")]
    InvalidDocumentRef,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::ExcessPrecision(_) => "EXCESS_PRECISION",
            Self::SingleSided => "SINGLE_SIDED",
            Self::Unbalanced { .. } => "UNBALANCED_POSTING",
            Self::HeadNotFound(_) => "HEAD_NOT_FOUND",
            Self::HeadInactive(_) => "HEAD_INACTIVE",
            Self::InvalidDrCr(_) => "INVALID_DR_CR",
            Self::InvalidHeadType(_) => "INVALID_HEAD_TYPE",
            Self::InvalidDocumentRef => "INVALID_DOCUMENT_REF",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::HeadNotFound(_) => Self::NotFound(err.to_string()),
            LedgerError::HeadInactive(_) | LedgerError::Unbalanced { .. } => {
                Self::BusinessRule(err.to_string())
            }
            LedgerError::InvalidDocumentRef => Self::Internal(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
