//! Collection repository.
//!
//! A collection is money received from a renter. Its gross is applied to the
//! renter's outstanding bills oldest first; withheld TDS and VAT count as
//! paid. Anything left over is held as a tenant advance.

use chrono::{NaiveDate, Utc};
use rentbook_core::billing::BillStatus;
use rentbook_core::collection::{CollectionError, WithholdingSplit, allocate};
use rentbook_core::ledger::{DepositAccount, DocumentRef, LedgerError, collection_lines};
use rentbook_core::reports::StatementEntryKind;
use rentbook_shared::AppError;
use rentbook_shared::types::{BillId, CollectionId, RenterId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::billing::{BillError, outstanding, outstanding_bill_rows};
use super::head::{HeadError, HeadRepository};
use super::is_unique_violation;
use super::ledger::{PostingError, PostingRequest, post_lines};
use super::property::{PropertyError, find_renter};
use super::tenant::{TenantEntry, record_tenant_entry};
use crate::entities::{bill_collections, bills, collection_allocations};

/// Error types for collection operations.
#[derive(Debug, thiserror::Error)]
pub enum CollectionRepoError {
    /// Collection not found.
    #[error("Collection not found: {0}")]
    NotFound(Uuid),

    /// A collection with this reference was already saved.
    #[error("Collection reference '{0}' already exists")]
    DuplicateReference(String),

    /// Inactive renters cannot pay.
    #[error("Renter {0} is inactive")]
    InactiveRenter(Uuid),

    /// Amounts or withholding are invalid.
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// Outstanding bills could not be read.
    #[error(transparent)]
    Bill(#[from] BillError),

    /// Renter lookup failed.
    #[error(transparent)]
    Property(#[from] PropertyError),

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

impl From<LedgerError> for CollectionRepoError {
    fn from(err: LedgerError) -> Self {
        Self::Posting(PostingError::Ledger(err))
    }
}

impl From<CollectionRepoError> for AppError {
    fn from(err: CollectionRepoError) -> Self {
        match err {
            CollectionRepoError::NotFound(_) => Self::NotFound(err.to_string()),
            CollectionRepoError::DuplicateReference(_) => Self::Conflict(err.to_string()),
            CollectionRepoError::InactiveRenter(_) => Self::BusinessRule(err.to_string()),
            CollectionRepoError::Collection(e) => e.into(),
            CollectionRepoError::Bill(e) => e.into(),
            CollectionRepoError::Property(e) => e.into(),
            CollectionRepoError::Head(e) => e.into(),
            CollectionRepoError::Posting(e) => e.into(),
            CollectionRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// How tax withheld by the renter is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Withholding {
    /// Explicit amounts.
    Amounts {
        /// Tax deducted at source.
        tds: Decimal,
        /// VAT withheld.
        vat: Decimal,
    },
    /// Rates applied to the gross.
    Rates {
        /// TDS rate (0.05 = 5%).
        tds_rate: Decimal,
        /// VAT rate.
        vat_rate: Decimal,
    },
}

impl Withholding {
    /// No tax withheld.
    pub const NONE: Self = Self::Amounts {
        tds: Decimal::ZERO,
        vat: Decimal::ZERO,
    };

    fn split(self, gross: Decimal) -> Result<WithholdingSplit, CollectionError> {
        match self {
            Self::Amounts { tds, vat } => WithholdingSplit::from_amounts(gross, tds, vat),
            Self::Rates { tds_rate, vat_rate } => {
                WithholdingSplit::from_rates(gross, tds_rate, vat_rate)
            }
        }
    }
}

/// Input for saving a collection.
#[derive(Debug, Clone)]
pub struct SaveCollectionInput {
    /// Paying renter.
    pub renter_id: RenterId,
    /// Date the money was received.
    pub collected_on: NaiveDate,
    /// Gross amount settled, withholding included.
    pub gross: Decimal,
    /// Tax withheld by the renter.
    pub withholding: Withholding,
    /// Where the net amount was deposited.
    pub deposit: DepositAccount,
    /// Client reference (receipt number); unique when given.
    pub reference: Option<String>,
    /// Free text.
    pub remarks: Option<String>,
}

/// A collection with the bills it settled.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionDetail {
    /// Collection header.
    pub collection: bill_collections::Model,
    /// Amounts applied per bill.
    pub allocations: Vec<collection_allocations::Model>,
}

/// Collection repository.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    db: DatabaseConnection,
}

impl CollectionRepository {
    /// Creates a new collection repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Saves a collection, settles bills oldest first and posts it.
    ///
    /// In one transaction: the collection and its per-bill allocations are
    /// inserted, each settled bill's paid amount and status move, the
    /// ledger is posted (deposit, TDS and VAT debited; receivable and
    /// tenant advance credited) and the renter's history gets one credit
    /// for the gross.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateReference` for a reused reference, a collection
    /// error for invalid amounts, or a not-found error for an unknown renter.
    pub async fn save_collection(
        &self,
        input: SaveCollectionInput,
    ) -> Result<CollectionDetail, CollectionRepoError> {
        let split = input.withholding.split(input.gross)?;
        let renter = find_renter(&self.db, input.renter_id).await?;
        if !renter.is_active {
            return Err(CollectionRepoError::InactiveRenter(renter.id));
        }
        let reference = input
            .reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if let Some(reference) = &reference {
            let existing = bill_collections::Entity::find()
                .filter(bill_collections::Column::Reference.eq(reference.as_str()))
                .one(&self.db)
                .await?;
            if existing.is_some() {
                warn!(reference = %reference, "Duplicate collection reference");
                return Err(CollectionRepoError::DuplicateReference(reference.clone()));
            }
        }
        let heads = HeadRepository::new(self.db.clone()).posting_heads().await?;

        let txn = self.db.begin().await?;

        let open_bills = outstanding_bill_rows(&txn, renter.id).await?;
        let candidates = open_bills
            .iter()
            .map(outstanding)
            .collect::<Result<Vec<_>, _>>()?;
        let allocation = allocate(split.gross, &candidates)?;

        let now = Utc::now().into();
        let collection_id = CollectionId::new();
        let collection = bill_collections::ActiveModel {
            id: Set(collection_id.into_inner()),
            renter_id: Set(renter.id),
            reference: Set(reference.clone()),
            collected_on: Set(input.collected_on),
            deposit_to: Set(input.deposit.into()),
            gross_amount: Set(split.gross),
            tds_amount: Set(split.tds),
            vat_amount: Set(split.vat),
            net_amount: Set(split.net),
            applied_amount: Set(allocation.applied),
            unapplied_amount: Set(allocation.unapplied),
            remarks: Set(input.remarks),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|err| match reference {
            Some(reference) if is_unique_violation(&err) => {
                warn!(reference = %reference, "Collection reference taken concurrently");
                CollectionRepoError::DuplicateReference(reference)
            }
            _ => err.into(),
        })?;

        let mut allocations = Vec::with_capacity(allocation.allocations.len());
        for applied in &allocation.allocations {
            let bill = open_bills
                .iter()
                .find(|bill| BillId::from_uuid(bill.id) == applied.bill_id)
                .cloned()
                .ok_or(BillError::BillNotFound(applied.bill_id.into_inner()))?;

            allocations.push(
                collection_allocations::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    collection_id: Set(collection.id),
                    bill_id: Set(bill.id),
                    amount: Set(applied.amount),
                    created_at: Set(now),
                }
                .insert(&txn)
                .await?,
            );

            let paid = bill.paid_amount + applied.amount;
            let status = BillStatus::from_amounts(bill.total_amount, paid);
            let mut active: bills::ActiveModel = bill.into();
            active.paid_amount = Set(paid);
            active.status = Set(status.into());
            active.updated_at = Set(now);
            active.update(&txn).await?;
        }

        let lines = collection_lines(&heads, input.deposit, &split, allocation.applied)?;
        post_lines(
            &txn,
            PostingRequest {
                document: DocumentRef::Collection(collection_id),
                entry_date: input.collected_on,
                posted_on: input.collected_on,
                lines,
            },
        )
        .await?;

        record_tenant_entry(
            &txn,
            TenantEntry {
                renter_id: renter.id,
                shop_id: None,
                trans_date: input.collected_on,
                kind: StatementEntryKind::Collection,
                bill_id: None,
                collection_id: Some(collection.id),
                description: collection
                    .reference
                    .as_ref()
                    .map_or_else(|| "Collection".to_string(), |r| format!("Collection {r}")),
                debit: Decimal::ZERO,
                credit: split.gross,
            },
        )
        .await?;

        txn.commit().await?;

        info!(
            collection_id = %collection.id,
            renter_id = %renter.id,
            gross = %split.gross,
            tds = %split.tds,
            vat = %split.vat,
            applied = %allocation.applied,
            unapplied = %allocation.unapplied,
            bills = allocations.len(),
            "Collection saved"
        );

        Ok(CollectionDetail {
            collection,
            allocations,
        })
    }

    /// Gets a collection with its allocations.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids.
    pub async fn get_collection(
        &self,
        collection_id: CollectionId,
    ) -> Result<CollectionDetail, CollectionRepoError> {
        let collection = bill_collections::Entity::find_by_id(collection_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CollectionRepoError::NotFound(collection_id.into_inner()))?;
        let allocations = collection_allocations::Entity::find()
            .filter(collection_allocations::Column::CollectionId.eq(collection.id))
            .order_by_asc(collection_allocations::Column::CreatedAt)
            .order_by_asc(collection_allocations::Column::Id)
            .all(&self.db)
            .await?;
        Ok(CollectionDetail {
            collection,
            allocations,
        })
    }

    /// Lists a renter's collections, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_collections(
        &self,
        renter_id: RenterId,
    ) -> Result<Vec<bill_collections::Model>, CollectionRepoError> {
        let collections = bill_collections::Entity::find()
            .filter(bill_collections::Column::RenterId.eq(renter_id.into_inner()))
            .order_by_desc(bill_collections::Column::CollectedOn)
            .order_by_desc(bill_collections::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(collections)
    }
}
