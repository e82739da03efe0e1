//! Business rule validation for postings.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{DrCr, PostingLine, PostingTotals};

/// Validates that a set of posting lines can be written to the journal.
///
/// Rules: at least two lines, every amount positive with at most two
/// decimal places, both sides present, and debits equal credits.
///
/// # Errors
///
/// Returns the first rule the lines violate.
pub fn validate_lines(lines: &[PostingLine]) -> Result<PostingTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        if line.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(line.head_id));
        }
        if line.amount.normalize().scale() > 2 {
            return Err(LedgerError::ExcessPrecision(line.amount));
        }
        match line.dr_cr {
            DrCr::Dr => has_debit = true,
            DrCr::Cr => has_credit = true,
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerError::SingleSided);
    }

    let totals = PostingTotals::from_lines(lines);
    if !totals.is_balanced {
        return Err(LedgerError::Unbalanced {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}

/// Returns the lines that cancel the given posting.
#[must_use]
pub fn reverse_lines(lines: &[PostingLine]) -> Vec<PostingLine> {
    lines
        .iter()
        .map(|line| PostingLine {
            dr_cr: line.dr_cr.opposite(),
            ..line.clone()
        })
        .collect()
}
