//! Utility charges computed from meter readings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BillingError;
use crate::round_money;

/// Consumption between two meter readings and its charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterCharge {
    /// Reading at the end of the previous period.
    pub previous: Decimal,
    /// Reading at the end of this period.
    pub current: Decimal,
    /// Units consumed.
    pub units: Decimal,
    /// Price per unit.
    pub unit_rate: Decimal,
    /// Charge, rounded to 2 dp.
    pub amount: Decimal,
}

impl MeterCharge {
    /// Computes the charge for the units consumed between two readings.
    ///
    /// # Errors
    ///
    /// Returns `MeterRollback` if `current < previous` and `NegativeRate`
    /// if `unit_rate` is negative.
    pub fn compute(
        previous: Decimal,
        current: Decimal,
        unit_rate: Decimal,
    ) -> Result<Self, BillingError> {
        if current < previous {
            return Err(BillingError::MeterRollback { previous, current });
        }
        if unit_rate < Decimal::ZERO {
            return Err(BillingError::NegativeRate(unit_rate));
        }

        let units = current - previous;
        Ok(Self {
            previous,
            current,
            units,
            unit_rate,
            amount: round_money(units * unit_rate),
        })
    }
}
