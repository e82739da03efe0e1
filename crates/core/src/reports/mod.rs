//! Report building from ledger balances and tenant history.
//!
//! - Trial balance
//! - Tenant statement with running balance

pub mod statement;
pub mod trial_balance;

pub use statement::{StatementEntryKind, StatementLine, TenantStatement};
pub use trial_balance::{TrialBalance, TrialBalanceRow};
