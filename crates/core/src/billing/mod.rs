//! Monthly billing rules.
//!
//! - Bill periods (calendar months) and due dates
//! - Bill particulars and their totals
//! - Meter-based utility charges
//! - Shop allocation windows used to route bills to renters
//! - Bill payment status

pub mod error;
pub mod meter;
pub mod period;
pub mod summary;
pub mod types;
pub mod window;

pub use error::BillingError;
pub use meter::MeterCharge;
pub use period::BillPeriod;
pub use summary::{BillSummary, DraftParticular};
pub use types::{BillStatus, ParticularKind};
pub use window::AllocationWindow;
