//! Voucher repository.
//!
//! Vouchers are manual double-entry documents: payments, receipts outside
//! the bill flow and journal adjustments. They are posted when saved.

use chrono::{NaiveDate, Utc};
use rentbook_core::ledger::{DocumentRef, DrCr, LedgerError, PostingLine, validate_lines};
use rentbook_shared::AppError;
use rentbook_shared::types::VoucherId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::head::{HeadError, HeadRepository};
use super::is_unique_violation;
use super::ledger::{PostingError, PostingRequest, post_lines};
use crate::entities::{sea_orm_active_enums::VoucherType, voucher_lines, vouchers};

/// Error types for voucher operations.
#[derive(Debug, thiserror::Error)]
pub enum VoucherError {
    /// Voucher not found.
    #[error("Voucher not found: {0}")]
    NotFound(Uuid),

    /// A voucher with this reference was already saved.
    #[error("Voucher reference '{0}' already exists")]
    DuplicateReference(String),

    /// Narration is required.
    #[error("Voucher narration cannot be empty")]
    EmptyNarration,

    /// Payments must credit and receipts must debit cash or bank.
    #[error("A {0:?} voucher must {1} cash or bank")]
    MissingCashLine(VoucherType, &'static str),

    /// Lines do not form a valid posting.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// System heads could not be resolved.
    #[error(transparent)]
    Head(#[from] HeadError),

    /// Ledger posting failed.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<VoucherError> for AppError {
    fn from(err: VoucherError) -> Self {
        match err {
            VoucherError::NotFound(_) => Self::NotFound(err.to_string()),
            VoucherError::DuplicateReference(_) => Self::Conflict(err.to_string()),
            VoucherError::EmptyNarration | VoucherError::MissingCashLine(..) => {
                Self::Validation(err.to_string())
            }
            VoucherError::Ledger(e) => e.into(),
            VoucherError::Head(e) => e.into(),
            VoucherError::Posting(e) => e.into(),
            VoucherError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a voucher.
#[derive(Debug, Clone)]
pub struct CreateVoucherInput {
    /// Payment, receipt or journal.
    pub voucher_type: VoucherType,
    /// Business date.
    pub voucher_date: NaiveDate,
    /// Narration.
    pub narration: String,
    /// Client reference; unique when given.
    pub reference: Option<String>,
    /// Balanced lines.
    pub lines: Vec<PostingLine>,
}

/// A voucher with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct VoucherDetail {
    /// Voucher header.
    pub voucher: vouchers::Model,
    /// Lines in entry order.
    pub lines: Vec<voucher_lines::Model>,
}

/// Voucher repository.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    db: DatabaseConnection,
}

impl VoucherRepository {
    /// Creates a new voucher repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates and posts a voucher.
    ///
    /// # Errors
    ///
    /// Returns a ledger error if the lines do not balance or touch an
    /// unknown or inactive head, `MissingCashLine` for a payment or receipt
    /// that does not move cash or bank, or `DuplicateReference`.
    pub async fn create_voucher(
        &self,
        input: CreateVoucherInput,
    ) -> Result<VoucherDetail, VoucherError> {
        let narration = input.narration.trim().to_string();
        if narration.is_empty() {
            return Err(VoucherError::EmptyNarration);
        }
        let totals = validate_lines(&input.lines)?;

        let heads = HeadRepository::new(self.db.clone()).posting_heads().await?;
        let cash_side = match input.voucher_type {
            VoucherType::Payment => Some((DrCr::Cr, "credit")),
            VoucherType::Receipt => Some((DrCr::Dr, "debit")),
            VoucherType::Journal => None,
        };
        if let Some((side, verb)) = cash_side {
            let moves_cash = input.lines.iter().any(|line| {
                line.dr_cr == side && (line.head_id == heads.cash || line.head_id == heads.bank)
            });
            if !moves_cash {
                return Err(VoucherError::MissingCashLine(input.voucher_type, verb));
            }
        }

        let reference = input
            .reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if let Some(reference) = &reference {
            let existing = vouchers::Entity::find()
                .filter(vouchers::Column::Reference.eq(reference.as_str()))
                .one(&self.db)
                .await?;
            if existing.is_some() {
                warn!(reference = %reference, "Duplicate voucher reference");
                return Err(VoucherError::DuplicateReference(reference.clone()));
            }
        }

        let txn = self.db.begin().await?;

        let voucher_id = VoucherId::new();
        let voucher = vouchers::ActiveModel {
            id: Set(voucher_id.into_inner()),
            voucher_type: Set(input.voucher_type),
            voucher_date: Set(input.voucher_date),
            reference: Set(reference.clone()),
            narration: Set(narration),
            total_amount: Set(totals.debit),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await
        .map_err(|err| match reference {
            Some(reference) if is_unique_violation(&err) => {
                warn!(reference = %reference, "Voucher reference taken concurrently");
                VoucherError::DuplicateReference(reference)
            }
            _ => err.into(),
        })?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for (line_no, line) in (1..).zip(&input.lines) {
            lines.push(
                voucher_lines::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    voucher_id: Set(voucher.id),
                    line_no: Set(line_no),
                    head_id: Set(line.head_id.into_inner()),
                    dr_cr: Set(line.dr_cr.into()),
                    amount: Set(line.amount),
                    narration: Set(line.narration.clone()),
                }
                .insert(&txn)
                .await?,
            );
        }

        post_lines(
            &txn,
            PostingRequest {
                document: DocumentRef::Voucher(voucher_id),
                entry_date: input.voucher_date,
                posted_on: input.voucher_date,
                lines: input.lines,
            },
        )
        .await?;

        txn.commit().await?;

        info!(
            voucher_id = %voucher.id,
            voucher_type = ?voucher.voucher_type,
            total = %voucher.total_amount,
            lines = lines.len(),
            "Voucher posted"
        );
        Ok(VoucherDetail { voucher, lines })
    }

    /// Gets a voucher with its lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids.
    pub async fn get_voucher(&self, voucher_id: VoucherId) -> Result<VoucherDetail, VoucherError> {
        let voucher = vouchers::Entity::find_by_id(voucher_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(VoucherError::NotFound(voucher_id.into_inner()))?;
        let lines = voucher_lines::Entity::find()
            .filter(voucher_lines::Column::VoucherId.eq(voucher.id))
            .order_by_asc(voucher_lines::Column::LineNo)
            .all(&self.db)
            .await?;
        Ok(VoucherDetail { voucher, lines })
    }

    /// Lists vouchers dated within a range, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_vouchers(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<vouchers::Model>, VoucherError> {
        let vouchers = vouchers::Entity::find()
            .filter(vouchers::Column::VoucherDate.between(from, to))
            .order_by_asc(vouchers::Column::VoucherDate)
            .order_by_asc(vouchers::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(vouchers)
    }
}
