//! Tax withheld by tenants from what they pay.
//!
//! A tenant paying a bill may deduct income tax at source (TDS) and VAT
//! and hand over only the net. The gross still settles the bill; the
//! withheld parts become recoverable from the tax authority.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CollectionError;
use crate::round_money;

/// Gross amount of a collection split into withholding and net received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingSplit {
    /// Amount settled against the tenant's account.
    pub gross: Decimal,
    /// Tax deducted at source.
    pub tds: Decimal,
    /// VAT withheld.
    pub vat: Decimal,
    /// Cash or bank amount actually received.
    pub net: Decimal,
}

impl WithholdingSplit {
    /// Builds a split from explicit withholding amounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the gross is not positive, a withholding is
    /// negative, an amount has more than 2 dp, or TDS plus VAT exceed the
    /// gross.
    pub fn from_amounts(
        gross: Decimal,
        tds: Decimal,
        vat: Decimal,
    ) -> Result<Self, CollectionError> {
        if gross <= Decimal::ZERO {
            return Err(CollectionError::NonPositiveAmount(gross));
        }
        for amount in [gross, tds, vat] {
            if amount.normalize().scale() > 2 {
                return Err(CollectionError::ExcessPrecision(amount));
            }
        }
        if tds < Decimal::ZERO {
            return Err(CollectionError::NegativeWithholding(tds));
        }
        if vat < Decimal::ZERO {
            return Err(CollectionError::NegativeWithholding(vat));
        }

        let withheld = tds + vat;
        if withheld > gross {
            return Err(CollectionError::WithholdingExceedsGross { gross, withheld });
        }

        Ok(Self {
            gross,
            tds,
            vat,
            net: gross - withheld,
        })
    }

    /// Builds a split by applying rates to the gross, rounding each
    /// withholding to 2 dp.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_amounts`], plus `NegativeWithholding` for a
    /// negative rate.
    pub fn from_rates(
        gross: Decimal,
        tds_rate: Decimal,
        vat_rate: Decimal,
    ) -> Result<Self, CollectionError> {
        for rate in [tds_rate, vat_rate] {
            if rate < Decimal::ZERO {
                return Err(CollectionError::NegativeWithholding(rate));
            }
        }
        Self::from_amounts(
            gross,
            round_money(gross * tds_rate),
            round_money(gross * vat_rate),
        )
    }

    /// Total withheld.
    #[must_use]
    pub fn withheld(&self) -> Decimal {
        self.tds + self.vat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_amounts() {
        let split = WithholdingSplit::from_amounts(dec!(10000), dec!(500), dec!(1500)).unwrap();
        assert_eq!(split.net, dec!(8000));
        assert_eq!(split.withheld(), dec!(2000));
    }

    #[test]
    fn test_from_rates_rounds() {
        let split = WithholdingSplit::from_rates(dec!(1234.57), dec!(0.05), dec!(0.15)).unwrap();
        assert_eq!(split.tds, dec!(61.73));
        assert_eq!(split.vat, dec!(185.19));
        assert_eq!(split.net, dec!(987.65));
        assert_eq!(split.tds + split.vat + split.net, split.gross);
    }

    #[test]
    fn test_zero_withholding() {
        let split = WithholdingSplit::from_rates(dec!(500), Decimal::ZERO, Decimal::ZERO).unwrap();
        assert_eq!(split.net, dec!(500));
    }

    #[test]
    fn test_rejects_withholding_above_gross() {
        assert!(matches!(
            WithholdingSplit::from_amounts(dec!(100), dec!(60), dec!(41)),
            Err(CollectionError::WithholdingExceedsGross { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(WithholdingSplit::from_amounts(Decimal::ZERO, dec!(0), dec!(0)).is_err());
        assert!(WithholdingSplit::from_amounts(dec!(100), dec!(-1), dec!(0)).is_err());
        assert!(WithholdingSplit::from_amounts(dec!(100.001), dec!(0), dec!(0)).is_err());
        assert!(WithholdingSplit::from_rates(dec!(100), dec!(-0.05), dec!(0)).is_err());
    }
}
