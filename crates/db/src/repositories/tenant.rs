//! Tenant account history and statements.
//!
//! Every bill, collection and void writes one `tenant_trans_history` row
//! carrying the renter's running balance (positive means the renter owes).

use chrono::{NaiveDate, Utc};
use rentbook_core::reports::{StatementEntryKind, TenantStatement};
use rentbook_shared::AppError;
use rentbook_shared::types::RenterId;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::debug;
use uuid::Uuid;

use super::property::{PropertyError, find_renter};
use crate::entities::{renters, tenant_trans_history};

/// Error types for tenant account reads.
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    /// `from` is after `to`.
    #[error("Statement range is empty: {from} is after {to}")]
    InvalidRange {
        /// Range start.
        from: NaiveDate,
        /// Range end.
        to: NaiveDate,
    },

    /// Renter lookup failed.
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TenantError> for AppError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::InvalidRange { .. } => Self::Validation(err.to_string()),
            TenantError::Property(e) => e.into(),
            TenantError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// A movement to record on a renter's account.
#[derive(Debug, Clone)]
pub(crate) struct TenantEntry {
    pub renter_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub trans_date: NaiveDate,
    pub kind: StatementEntryKind,
    pub bill_id: Option<Uuid>,
    pub collection_id: Option<Uuid>,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
}

/// Appends a movement, carrying the renter's running balance forward.
///
/// The renter row is locked first so concurrent movements cannot read the
/// same previous balance.
pub(crate) async fn record_tenant_entry<C>(
    conn: &C,
    entry: TenantEntry,
) -> Result<tenant_trans_history::Model, DbErr>
where
    C: ConnectionTrait,
{
    // Movements of one renter are serialized on the renter row.
    renters::Entity::find_by_id(entry.renter_id)
        .lock_exclusive()
        .one(conn)
        .await?;

    let previous = tenant_trans_history::Entity::find()
        .filter(tenant_trans_history::Column::RenterId.eq(entry.renter_id))
        .order_by_desc(tenant_trans_history::Column::CreatedAt)
        .order_by_desc(tenant_trans_history::Column::Id)
        .limit(1)
        .one(conn)
        .await?
        .map_or(Decimal::ZERO, |row| row.balance);

    let balance = previous + entry.debit - entry.credit;
    let row = tenant_trans_history::ActiveModel {
        id: Set(Uuid::now_v7()),
        renter_id: Set(entry.renter_id),
        shop_id: Set(entry.shop_id),
        trans_date: Set(entry.trans_date),
        kind: Set(entry.kind.into()),
        bill_id: Set(entry.bill_id),
        collection_id: Set(entry.collection_id),
        description: Set(entry.description),
        debit: Set(entry.debit),
        credit: Set(entry.credit),
        balance: Set(balance),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    debug!(
        renter_id = %row.renter_id,
        kind = entry.kind.as_str(),
        balance = %row.balance,
        "Tenant history recorded"
    );
    Ok(row)
}

/// Tenant repository for statements and balances.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    db: DatabaseConnection,
}

impl TenantRepository {
    /// Creates a new tenant repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds a renter's statement for an inclusive date range.
    ///
    /// The opening balance is everything recorded before `from`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` if `from > to`, or a not-found error for an
    /// unknown renter.
    pub async fn statement(
        &self,
        renter_id: RenterId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<TenantStatement, TenantError> {
        if from > to {
            return Err(TenantError::InvalidRange { from, to });
        }
        find_renter(&self.db, renter_id).await?;

        let rows = tenant_trans_history::Entity::find()
            .filter(tenant_trans_history::Column::RenterId.eq(renter_id.into_inner()))
            .filter(tenant_trans_history::Column::TransDate.lte(to))
            .order_by_asc(tenant_trans_history::Column::TransDate)
            .order_by_asc(tenant_trans_history::Column::CreatedAt)
            .order_by_asc(tenant_trans_history::Column::Id)
            .all(&self.db)
            .await?;

        let (before, within): (Vec<_>, Vec<_>) =
            rows.into_iter().partition(|row| row.trans_date < from);
        let opening: Decimal = before.iter().map(|row| row.debit - row.credit).sum();
        let lines = within
            .iter()
            .map(tenant_trans_history::Model::statement_line)
            .collect();

        Ok(TenantStatement::build(opening, lines))
    }

    /// Amount a renter currently owes; negative when in advance.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown renter.
    pub async fn balance(&self, renter_id: RenterId) -> Result<Decimal, TenantError> {
        find_renter(&self.db, renter_id).await?;

        let rows = tenant_trans_history::Entity::find()
            .filter(tenant_trans_history::Column::RenterId.eq(renter_id.into_inner()))
            .all(&self.db)
            .await?;
        Ok(rows.iter().map(|row| row.debit - row.credit).sum())
    }
}
