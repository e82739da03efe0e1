//! Double-entry bookkeeping logic.
//!
//! This module implements the posting rules behind every bill, collection
//! and voucher:
//! - Debit/credit tags and head-of-account types
//! - Running balances kept per head (`ledger_current` semantics)
//! - Validation that a set of posting lines balances
//! - Posting templates for bills and collections
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod templates;
pub mod types;
pub mod validation;

pub use balance::LedgerBalance;
pub use error::LedgerError;
pub use templates::{DepositAccount, PostingHeads, bill_lines, collection_lines};
pub use types::{DocumentRef, DrCr, HeadType, PostingLine, PostingTotals};
pub use validation::{reverse_lines, validate_lines};
