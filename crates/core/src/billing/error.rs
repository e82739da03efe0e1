//! Billing error types.

use chrono::NaiveDate;
use rentbook_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::ParticularKind;

/// Errors raised by billing rules.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Month outside 1..=12.
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    /// Period string is not `YYYY-MM`.
    #[error("Invalid bill period '{0}', expected YYYY-MM")]
    InvalidPeriod(String),

    /// Allocation ends before it starts.
    #[error("Allocation ends on {end} before it starts on {start}")]
    InvalidWindow {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Current meter reading is below the previous one.
    #[error("Meter reading went backwards: previous {previous}, current {current}")]
    MeterRollback {
        /// Previous reading.
        previous: Decimal,
        /// Current reading.
        current: Decimal,
    },

    /// Unit rate is negative.
    #[error("Unit rate cannot be negative: {0}")]
    NegativeRate(Decimal),

    /// A bill needs at least one particular.
    #[error("Bill has no particulars")]
    NoParticulars,

    /// Particular amount is zero or negative.
    #[error("Particular '{0}' must have a positive amount")]
    NonPositiveParticular(ParticularKind),

    /// Amount has more than two decimal places.
    #[error("Amount {0} has more than 2 decimal places")]
    ExcessPrecision(Decimal),

    /// Unknown particular kind.
    #[error("Unknown bill particular: {0}")]
    UnknownParticularKind(String),

    /// Unknown bill status.
    #[error("Unknown bill status: {0}")]
    UnknownStatus(String),

    /// Due day outside 1..=31.
    #[error("Invalid due day: {0}")]
    InvalidDueDay(u32),
}

impl BillingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMonth(_) => "INVALID_MONTH",
            Self::InvalidPeriod(_) => "INVALID_PERIOD",
            Self::InvalidWindow { .. } => "INVALID_ALLOCATION_WINDOW",
            Self::MeterRollback { .. } => "METER_ROLLBACK",
            Self::NegativeRate(_) => "NEGATIVE_RATE",
            Self::NoParticulars => "NO_PARTICULARS",
            Self::NonPositiveParticular(_) => "NON_POSITIVE_PARTICULAR",
            Self::ExcessPrecision(_) => "EXCESS_PRECISION",
            Self::UnknownParticularKind(_) => "UNKNOWN_PARTICULAR_KIND",
            Self::UnknownStatus(_) => "UNKNOWN_BILL_STATUS",
            Self::InvalidDueDay(_) => "INVALID_DUE_DAY",
        }
    }
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::NoParticulars => Self::BusinessRule(err.to_string()),
            BillingError::UnknownStatus(_) => Self::Internal(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
