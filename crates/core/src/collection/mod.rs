//! Collections against bills.
//!
//! - TDS/VAT withholding splits of a received amount
//! - FIFO allocation of a collection across a renter's outstanding bills

pub mod allocation;
pub mod error;
pub mod withholding;

pub use allocation::{Allocation, CollectionAllocation, OutstandingBill, allocate};
pub use error::CollectionError;
pub use withholding::WithholdingSplit;
