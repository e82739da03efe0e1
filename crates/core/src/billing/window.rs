//! Time-bounded shop allocations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::BillingError;
use super::period::BillPeriod;

/// The dates a renter holds a shop. An open `end` means the allocation is
/// still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationWindow {
    /// First day of the allocation.
    pub start: NaiveDate,
    /// Last day of the allocation, inclusive.
    pub end: Option<NaiveDate>,
}

impl AllocationWindow {
    /// Creates a window.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWindow` if `end` is before `start`.
    pub fn new(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, BillingError> {
        if let Some(end) = end
            && end < start
        {
            return Err(BillingError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns true if the allocation is in force on `date`.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start && self.end.is_none_or(|end| date <= end)
    }

    /// Returns true if the allocation is in force on any day of `period`.
    #[must_use]
    pub fn overlaps_period(&self, period: &BillPeriod) -> bool {
        self.start <= period.last_day() && self.end.is_none_or(|end| end >= period.first_day())
    }

    /// Returns true if two allocations share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let self_before_other = self.end.is_some_and(|end| end < other.start);
        let other_before_self = other.end.is_some_and(|end| end < self.start);
        !self_before_other && !other_before_self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_before_start_rejected() {
        assert!(matches!(
            AllocationWindow::new(date(2024, 5, 1), Some(date(2024, 4, 30))),
            Err(BillingError::InvalidWindow { .. })
        ));
        assert!(AllocationWindow::new(date(2024, 5, 1), Some(date(2024, 5, 1))).is_ok());
    }

    #[test]
    fn test_covers_open_ended() {
        let window = AllocationWindow::new(date(2024, 1, 15), None).unwrap();
        assert!(!window.covers(date(2024, 1, 14)));
        assert!(window.covers(date(2024, 1, 15)));
        assert!(window.covers(date(2030, 1, 1)));
    }

    #[test]
    fn test_covers_closed() {
        let window = AllocationWindow::new(date(2024, 1, 1), Some(date(2024, 6, 30))).unwrap();
        assert!(window.covers(date(2024, 6, 30)));
        assert!(!window.covers(date(2024, 7, 1)));
    }

    #[test]
    fn test_overlaps_period() {
        let window = AllocationWindow::new(date(2024, 3, 20), Some(date(2024, 5, 5))).unwrap();
        assert!(!window.overlaps_period(&BillPeriod::new(2024, 2).unwrap()));
        assert!(window.overlaps_period(&BillPeriod::new(2024, 3).unwrap()));
        assert!(window.overlaps_period(&BillPeriod::new(2024, 5).unwrap()));
        assert!(!window.overlaps_period(&BillPeriod::new(2024, 6).unwrap()));
    }

    #[test]
    fn test_overlaps() {
        let first = AllocationWindow::new(date(2024, 1, 1), Some(date(2024, 3, 31))).unwrap();
        let adjacent = AllocationWindow::new(date(2024, 4, 1), None).unwrap();
        let clashing = AllocationWindow::new(date(2024, 3, 31), None).unwrap();
        let open = AllocationWindow::new(date(2023, 1, 1), None).unwrap();

        assert!(!first.overlaps(&adjacent));
        assert!(!adjacent.overlaps(&first));
        assert!(first.overlaps(&clashing));
        assert!(open.overlaps(&first));
        assert!(open.overlaps(&adjacent));
    }
}
