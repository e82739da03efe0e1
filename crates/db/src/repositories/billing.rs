//! Billing repository: staged particulars, bill generation and voids.
//!
//! Generation commits each shop's drafts for a period into one bill, posts
//! it to the ledger and records it on the renter's account, all in one
//! database transaction per shop.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use rentbook_core::billing::{
    BillPeriod, BillStatus, BillSummary, BillingError, DraftParticular, MeterCharge,
    ParticularKind,
};
use rentbook_core::collection::OutstandingBill;
use rentbook_core::ledger::{DocumentRef, PostingHeads, bill_lines, reverse_lines};
use rentbook_core::reports::StatementEntryKind;
use rentbook_shared::AppError;
use rentbook_shared::types::{BillId, RenterId, ShopId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::head::{HeadError, HeadRepository};
use super::ledger::{PostingError, PostingRequest, journal_for_document, post_lines};
use super::property::{PropertyError, allocations_for_period, find_shop};
use super::tenant::{TenantEntry, record_tenant_entry};
use crate::entities::{
    bill_particular_drafts, bill_particulars, bills, collection_allocations,
    sea_orm_active_enums::{BillState, ParticularType},
    shop_allocations, shops,
};

/// Error types for billing operations.
#[derive(Debug, thiserror::Error)]
pub enum BillError {
    /// Bill not found.
    #[error("Bill not found: {0}")]
    BillNotFound(Uuid),

    /// Draft particular not found.
    #[error("Draft particular not found: {0}")]
    DraftNotFound(Uuid),

    /// The shop already has a bill for the period.
    #[error("Shop {shop_id} is already billed for {period}")]
    AlreadyBilled {
        /// Shop.
        shop_id: Uuid,
        /// Period.
        period: BillPeriod,
    },

    /// Meter readings were given for an unmetered charge.
    #[error("'{0}' is not a metered charge")]
    NotMetered(ParticularKind),

    /// Only bills with nothing collected can be voided.
    #[error("Bill {bill_id} is {status:?} and cannot be voided")]
    CannotVoid {
        /// Bill.
        bill_id: Uuid,
        /// Its status.
        status: BillStatus,
    },

    /// A billing rule was broken.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Shop lookup failed.
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

impl From<BillError> for AppError {
    fn from(err: BillError) -> Self {
        match err {
            BillError::BillNotFound(_) | BillError::DraftNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            BillError::AlreadyBilled { .. } => Self::Conflict(err.to_string()),
            BillError::NotMetered(_) => Self::Validation(err.to_string()),
            BillError::CannotVoid { .. } => Self::BusinessRule(err.to_string()),
            BillError::Billing(e) => e.into(),
            BillError::Property(e) => e.into(),
            BillError::Head(e) => e.into(),
            BillError::Posting(e) => e.into(),
            BillError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for staging a fixed-amount particular.
#[derive(Debug, Clone)]
pub struct StageParticularInput {
    /// Shop billed.
    pub shop_id: ShopId,
    /// Period billed.
    pub period: BillPeriod,
    /// Kind of charge.
    pub kind: ParticularKind,
    /// Amount.
    pub amount: Decimal,
    /// Description printed on the bill.
    pub description: Option<String>,
}

/// Input for staging a metered particular from readings.
#[derive(Debug, Clone)]
pub struct StageMeterInput {
    /// Shop billed.
    pub shop_id: ShopId,
    /// Period billed.
    pub period: BillPeriod,
    /// Metered kind of charge.
    pub kind: ParticularKind,
    /// Previous reading; defaults to the last billed reading for the shop.
    pub previous: Option<Decimal>,
    /// Current reading.
    pub current: Decimal,
    /// Price per unit.
    pub unit_rate: Decimal,
    /// Description printed on the bill.
    pub description: Option<String>,
}

/// Input for generating a period's bills.
#[derive(Debug, Clone, Copy)]
pub struct GenerateBillsInput {
    /// Period billed.
    pub period: BillPeriod,
    /// Date printed on the bills and used for posting.
    pub bill_date: NaiveDate,
    /// Day of the month the bills fall due.
    pub due_day: u32,
}

/// Why a shop got no bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The shop already has a bill for the period.
    AlreadyBilled,
    /// Nobody holds the shop during the period.
    NoAllocation,
    /// Nothing to charge.
    NoCharges,
    /// Billing the shop failed; its drafts are untouched.
    Failed,
}

/// A shop left out of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedShop {
    /// Shop.
    pub shop_id: Uuid,
    /// Reason.
    pub reason: SkipReason,
    /// What went wrong, for `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Period billed.
    pub period: BillPeriod,
    /// Bills created.
    pub generated: Vec<bills::Model>,
    /// Shops left out.
    pub skipped: Vec<SkippedShop>,
}

/// A bill with its line items and the collections applied to it.
#[derive(Debug, Clone, Serialize)]
pub struct BillDetail {
    /// Bill header.
    pub bill: bills::Model,
    /// Line items.
    pub particulars: Vec<bill_particulars::Model>,
    /// Collections applied.
    pub allocations: Vec<collection_allocations::Model>,
}

/// Filter options for listing bills.
#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    /// Only this period.
    pub period: Option<BillPeriod>,
    /// Only this renter.
    pub renter_id: Option<RenterId>,
    /// Only this shop.
    pub shop_id: Option<ShopId>,
    /// Only this status.
    pub status: Option<BillStatus>,
}

enum ShopOutcome {
    Billed(bills::Model),
    Skipped(SkipReason),
}

/// Billing repository.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    db: DatabaseConnection,
}

impl BillingRepository {
    /// Creates a new billing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========== Drafts ==========

    /// Stages a particular for a shop's next bill.
    ///
    /// # Errors
    ///
    /// Returns a billing error for a non-positive or over-precise amount,
    /// `AlreadyBilled` if the period is already billed, or a not-found
    /// error for an unknown shop.
    pub async fn stage_particular(
        &self,
        input: StageParticularInput,
    ) -> Result<bill_particular_drafts::Model, BillError> {
        let particular = DraftParticular {
            kind: input.kind,
            amount: input.amount,
            description: input.description,
        };
        BillSummary::from_particulars(std::slice::from_ref(&particular))?;
        self.ensure_stageable(input.shop_id, input.period).await?;

        let draft = insert_draft(&self.db, input.shop_id, input.period, particular, None).await?;
        info!(
            draft_id = %draft.id,
            shop_id = %draft.shop_id,
            period = %draft.period,
            kind = input.kind.as_str(),
            amount = %draft.amount,
            "Bill particular staged"
        );
        Ok(draft)
    }

    /// Stages a metered particular computed from meter readings.
    ///
    /// # Errors
    ///
    /// Returns `NotMetered` for unmetered kinds, a billing error for a
    /// reading that went backwards or a zero charge, and the errors of
    /// [`Self::stage_particular`].
    pub async fn stage_meter_particular(
        &self,
        input: StageMeterInput,
    ) -> Result<bill_particular_drafts::Model, BillError> {
        if !input.kind.is_metered() {
            return Err(BillError::NotMetered(input.kind));
        }
        self.ensure_stageable(input.shop_id, input.period).await?;

        let previous = match input.previous {
            Some(reading) => reading,
            None => self
                .last_meter_reading(input.shop_id, input.kind)
                .await?
                .unwrap_or(Decimal::ZERO),
        };
        let charge = MeterCharge::compute(previous, input.current, input.unit_rate)?;
        if charge.amount <= Decimal::ZERO {
            return Err(BillingError::NonPositiveParticular(input.kind).into());
        }

        let description = input.description.or_else(|| {
            Some(format!(
                "{} units @ {} ({} - {})",
                charge.units, charge.unit_rate, charge.previous, charge.current
            ))
        });
        let particular = DraftParticular {
            kind: input.kind,
            amount: charge.amount,
            description,
        };

        let draft = insert_draft(
            &self.db,
            input.shop_id,
            input.period,
            particular,
            Some(charge),
        )
        .await?;
        info!(
            draft_id = %draft.id,
            shop_id = %draft.shop_id,
            kind = input.kind.as_str(),
            units = %charge.units,
            amount = %charge.amount,
            "Metered particular staged"
        );
        Ok(draft)
    }

    /// Lists staged particulars for a period, optionally for one shop.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_drafts(
        &self,
        period: BillPeriod,
        shop_id: Option<ShopId>,
    ) -> Result<Vec<bill_particular_drafts::Model>, BillError> {
        let mut query = bill_particular_drafts::Entity::find()
            .filter(bill_particular_drafts::Column::Period.eq(period.to_string()));
        if let Some(shop_id) = shop_id {
            query = query.filter(bill_particular_drafts::Column::ShopId.eq(shop_id.into_inner()));
        }
        let drafts = query
            .order_by_asc(bill_particular_drafts::Column::ShopId)
            .order_by_asc(bill_particular_drafts::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(drafts)
    }

    /// Removes a staged particular.
    ///
    /// # Errors
    ///
    /// Returns `DraftNotFound` for unknown ids.
    pub async fn discard_draft(&self, draft_id: Uuid) -> Result<(), BillError> {
        let result = bill_particular_drafts::Entity::delete_by_id(draft_id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(BillError::DraftNotFound(draft_id));
        }
        info!(draft_id = %draft_id, "Draft particular discarded");
        Ok(())
    }

    async fn ensure_stageable(&self, shop_id: ShopId, period: BillPeriod) -> Result<(), BillError> {
        find_shop(&self.db, shop_id).await?;
        if find_bill_for_period(&self.db, shop_id.into_inner(), period)
            .await?
            .is_some()
        {
            return Err(BillError::AlreadyBilled {
                shop_id: shop_id.into_inner(),
                period,
            });
        }
        Ok(())
    }

    async fn last_meter_reading(
        &self,
        shop_id: ShopId,
        kind: ParticularKind,
    ) -> Result<Option<Decimal>, BillError> {
        let bill_ids: Vec<Uuid> = bills::Entity::find()
            .filter(bills::Column::ShopId.eq(shop_id.into_inner()))
            .filter(bills::Column::Status.ne(BillState::Void))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|bill| bill.id)
            .collect();
        if bill_ids.is_empty() {
            return Ok(None);
        }

        let last = bill_particulars::Entity::find()
            .filter(bill_particulars::Column::BillId.is_in(bill_ids))
            .filter(bill_particulars::Column::Kind.eq(ParticularType::from(kind)))
            .filter(bill_particulars::Column::MeterCurrent.is_not_null())
            .order_by_desc(bill_particulars::Column::CreatedAt)
            .limit(1)
            .one(&self.db)
            .await?;
        Ok(last.and_then(|particular| particular.meter_current))
    }

    // ========== Generation ==========

    /// Generates the bills of a period.
    ///
    /// Every shop with staged particulars or an allocation during the
    /// period is considered. A shop's monthly rent is charged automatically
    /// unless a rent particular was staged. Shops that are already billed,
    /// not allocated, have nothing to charge or fail to bill are reported
    /// as skipped. Each shop is committed in its own transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if system heads are missing or the shops to bill
    /// cannot be read. A shop that fails to bill is reported as skipped
    /// with `SkipReason::Failed` and the run carries on.
    pub async fn generate_bills(
        &self,
        input: GenerateBillsInput,
    ) -> Result<GenerationReport, BillError> {
        let due_date = input.period.due_date(input.due_day)?;
        let heads = HeadRepository::new(self.db.clone()).posting_heads().await?;

        let allocations = allocations_for_period(&self.db, input.period).await?;
        let drafted: Vec<Uuid> = bill_particular_drafts::Entity::find()
            .filter(bill_particular_drafts::Column::Period.eq(input.period.to_string()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|draft| draft.shop_id)
            .collect();

        let shop_ids: BTreeSet<Uuid> = drafted
            .into_iter()
            .chain(allocations.iter().map(|allocation| allocation.shop_id))
            .collect();

        let mut report = GenerationReport {
            period: input.period,
            generated: Vec::new(),
            skipped: Vec::new(),
        };

        for shop_id in shop_ids {
            let allocation = allocations
                .iter()
                .filter(|allocation| allocation.shop_id == shop_id)
                .max_by_key(|allocation| allocation.start_date);

            let outcome = self
                .bill_shop(&heads, &input, due_date, shop_id, allocation)
                .await;
            match outcome {
                Ok(ShopOutcome::Billed(bill)) => {
                    info!(
                        bill_id = %bill.id,
                        shop_id = %shop_id,
                        renter_id = %bill.renter_id,
                        period = %bill.period,
                        total = %bill.total_amount,
                        "Bill generated"
                    );
                    report.generated.push(bill);
                }
                Ok(ShopOutcome::Skipped(reason)) => {
                    warn!(shop_id = %shop_id, reason = ?reason, period = %input.period, "Shop skipped");
                    report.skipped.push(SkippedShop {
                        shop_id,
                        reason,
                        error: None,
                    });
                }
                Err(err) => {
                    error!(shop_id = %shop_id, period = %input.period, error = %err, "Bill generation failed for shop");
                    report.skipped.push(SkippedShop {
                        shop_id,
                        reason: SkipReason::Failed,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        info!(
            period = %input.period,
            generated = report.generated.len(),
            skipped = report.skipped.len(),
            "Bill generation finished"
        );
        Ok(report)
    }

    /// Bills one shop in its own transaction, committing only a new bill.
    async fn bill_shop(
        &self,
        heads: &PostingHeads,
        input: &GenerateBillsInput,
        due_date: NaiveDate,
        shop_id: Uuid,
        allocation: Option<&shop_allocations::Model>,
    ) -> Result<ShopOutcome, BillError> {
        let txn = self.db.begin().await?;
        let outcome = generate_for_shop(&txn, heads, input, due_date, shop_id, allocation).await?;
        match outcome {
            ShopOutcome::Billed(_) => txn.commit().await?,
            ShopOutcome::Skipped(_) => txn.rollback().await?,
        }
        Ok(outcome)
    }

    // ========== Reads ==========

    /// Gets a bill with its particulars and collections.
    ///
    /// # Errors
    ///
    /// Returns `BillNotFound` for unknown ids.
    pub async fn get_bill(&self, bill_id: BillId) -> Result<BillDetail, BillError> {
        let bill = bills::Entity::find_by_id(bill_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(BillError::BillNotFound(bill_id.into_inner()))?;

        let particulars = bill_particulars::Entity::find()
            .filter(bill_particulars::Column::BillId.eq(bill.id))
            .order_by_asc(bill_particulars::Column::CreatedAt)
            .order_by_asc(bill_particulars::Column::Id)
            .all(&self.db)
            .await?;
        let allocations = collection_allocations::Entity::find()
            .filter(collection_allocations::Column::BillId.eq(bill.id))
            .order_by_asc(collection_allocations::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(BillDetail {
            bill,
            particulars,
            allocations,
        })
    }

    /// Lists bills, newest period first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_bills(&self, filter: BillFilter) -> Result<Vec<bills::Model>, BillError> {
        let mut query = bills::Entity::find();
        if let Some(period) = filter.period {
            query = query.filter(bills::Column::Period.eq(period.to_string()));
        }
        if let Some(renter_id) = filter.renter_id {
            query = query.filter(bills::Column::RenterId.eq(renter_id.into_inner()));
        }
        if let Some(shop_id) = filter.shop_id {
            query = query.filter(bills::Column::ShopId.eq(shop_id.into_inner()));
        }
        if let Some(status) = filter.status {
            query = query.filter(bills::Column::Status.eq(BillState::from(status)));
        }

        let bills = query
            .order_by_desc(bills::Column::Period)
            .order_by_asc(bills::Column::ShopId)
            .all(&self.db)
            .await?;
        Ok(bills)
    }

    /// Lists a renter's bills that still have something due.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn outstanding_bills(
        &self,
        renter_id: RenterId,
    ) -> Result<Vec<OutstandingBill>, BillError> {
        let bills = outstanding_bill_rows(&self.db, renter_id.into_inner()).await?;
        bills.iter().map(outstanding).collect()
    }

    // ========== Void ==========

    /// Voids an unpaid bill, reversing its ledger posting.
    ///
    /// # Errors
    ///
    /// Returns `CannotVoid` unless the bill is unpaid, `BillNotFound` for
    /// unknown ids, or a posting error.
    pub async fn void_bill(
        &self,
        bill_id: BillId,
        void_date: NaiveDate,
        reason: Option<String>,
    ) -> Result<bills::Model, BillError> {
        let txn = self.db.begin().await?;

        let bill = bills::Entity::find_by_id(bill_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(BillError::BillNotFound(bill_id.into_inner()))?;

        let status = BillStatus::from(bill.status);
        if status != BillStatus::Unpaid || !bill.paid_amount.is_zero() {
            warn!(bill_id = %bill.id, status = status.as_str(), "Void rejected");
            return Err(BillError::CannotVoid {
                bill_id: bill.id,
                status,
            });
        }

        let document = DocumentRef::Bill(bill_id);
        let posted: Vec<_> = journal_for_document(&txn, document)
            .await?
            .iter()
            .map(crate::entities::account_journal::Model::posting_line)
            .collect();
        let lines = reverse_lines(&posted)
            .into_iter()
            .map(|line| line.with_narration("bill voided"))
            .collect();

        post_lines(
            &txn,
            PostingRequest {
                document,
                entry_date: void_date,
                posted_on: void_date,
                lines,
            },
        )
        .await?;

        record_tenant_entry(
            &txn,
            TenantEntry {
                renter_id: bill.renter_id,
                shop_id: Some(bill.shop_id),
                trans_date: void_date,
                kind: StatementEntryKind::Void,
                bill_id: Some(bill.id),
                collection_id: None,
                description: format!("Bill {} voided", bill.period),
                debit: Decimal::ZERO,
                credit: bill.total_amount,
            },
        )
        .await?;

        let mut active: bills::ActiveModel = bill.into();
        active.status = Set(BillState::Void);
        active.voided_on = Set(Some(void_date));
        active.void_reason = Set(reason);
        active.updated_at = Set(Utc::now().into());
        let bill = active.update(&txn).await?;

        txn.commit().await?;

        info!(bill_id = %bill.id, total = %bill.total_amount, "Bill voided");
        Ok(bill)
    }
}

async fn generate_for_shop(
    txn: &DatabaseTransaction,
    heads: &PostingHeads,
    input: &GenerateBillsInput,
    due_date: NaiveDate,
    shop_id: Uuid,
    allocation: Option<&shop_allocations::Model>,
) -> Result<ShopOutcome, BillError> {
    if find_bill_for_period(txn, shop_id, input.period).await?.is_some() {
        return Ok(ShopOutcome::Skipped(SkipReason::AlreadyBilled));
    }
    let Some(allocation) = allocation else {
        return Ok(ShopOutcome::Skipped(SkipReason::NoAllocation));
    };
    let shop = shops::Entity::find_by_id(shop_id)
        .one(txn)
        .await?
        .ok_or(PropertyError::ShopNotFound(shop_id))?;

    let drafts = bill_particular_drafts::Entity::find()
        .filter(bill_particular_drafts::Column::ShopId.eq(shop_id))
        .filter(bill_particular_drafts::Column::Period.eq(input.period.to_string()))
        .order_by_asc(bill_particular_drafts::Column::CreatedAt)
        .all(txn)
        .await?;

    let mut particulars: Vec<NewParticular> = drafts.iter().map(NewParticular::from_draft).collect();
    let rent_staged = particulars
        .iter()
        .any(|p| p.particular.kind == ParticularKind::Rent);
    if !rent_staged && shop.monthly_rent > Decimal::ZERO {
        particulars.insert(
            0,
            NewParticular {
                particular: DraftParticular {
                    kind: ParticularKind::Rent,
                    amount: shop.monthly_rent,
                    description: Some(format!("Rent for {}", input.period)),
                },
                meter: None,
            },
        );
    }
    if particulars.is_empty() {
        return Ok(ShopOutcome::Skipped(SkipReason::NoCharges));
    }

    let draft_particulars: Vec<DraftParticular> =
        particulars.iter().map(|p| p.particular.clone()).collect();
    let summary = BillSummary::from_particulars(&draft_particulars)?;

    let now = Utc::now().into();
    let bill_id = BillId::new();
    let bill = bills::ActiveModel {
        id: Set(bill_id.into_inner()),
        shop_id: Set(shop.id),
        renter_id: Set(allocation.renter_id),
        allocation_id: Set(allocation.id),
        period: Set(input.period.to_string()),
        bill_date: Set(input.bill_date),
        due_date: Set(due_date),
        total_amount: Set(summary.total),
        paid_amount: Set(Decimal::ZERO),
        status: Set(BillState::Unpaid),
        void_reason: Set(None),
        voided_on: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;

    for new in particulars {
        bill_particulars::ActiveModel {
            id: Set(Uuid::now_v7()),
            bill_id: Set(bill.id),
            kind: Set(new.particular.kind.into()),
            amount: Set(new.particular.amount),
            description: Set(new.particular.description),
            meter_previous: Set(new.meter.map(|m| m.previous)),
            meter_current: Set(new.meter.map(|m| m.current)),
            unit_rate: Set(new.meter.map(|m| m.unit_rate)),
            created_at: Set(now),
        }
        .insert(txn)
        .await?;
    }

    post_lines(
        txn,
        PostingRequest {
            document: DocumentRef::Bill(bill_id),
            entry_date: input.bill_date,
            posted_on: input.bill_date,
            lines: bill_lines(heads, &summary),
        },
    )
    .await?;

    record_tenant_entry(
        txn,
        TenantEntry {
            renter_id: bill.renter_id,
            shop_id: Some(shop.id),
            trans_date: input.bill_date,
            kind: StatementEntryKind::Bill,
            bill_id: Some(bill.id),
            collection_id: None,
            description: format!("Bill {} for shop {}", input.period, shop.code),
            debit: summary.total,
            credit: Decimal::ZERO,
        },
    )
    .await?;

    bill_particular_drafts::Entity::delete_many()
        .filter(bill_particular_drafts::Column::ShopId.eq(shop_id))
        .filter(bill_particular_drafts::Column::Period.eq(input.period.to_string()))
        .exec(txn)
        .await?;

    Ok(ShopOutcome::Billed(bill))
}

struct NewParticular {
    particular: DraftParticular,
    meter: Option<MeterReadings>,
}

#[derive(Clone, Copy)]
struct MeterReadings {
    previous: Decimal,
    current: Decimal,
    unit_rate: Decimal,
}

impl NewParticular {
    fn from_draft(draft: &bill_particular_drafts::Model) -> Self {
        let meter = match (draft.meter_previous, draft.meter_current, draft.unit_rate) {
            (Some(previous), Some(current), Some(unit_rate)) => Some(MeterReadings {
                previous,
                current,
                unit_rate,
            }),
            _ => None,
        };
        Self {
            particular: DraftParticular {
                kind: draft.kind.into(),
                amount: draft.amount,
                description: draft.description.clone(),
            },
            meter,
        }
    }
}

async fn insert_draft<C>(
    conn: &C,
    shop_id: ShopId,
    period: BillPeriod,
    particular: DraftParticular,
    charge: Option<MeterCharge>,
) -> Result<bill_particular_drafts::Model, DbErr>
where
    C: ConnectionTrait,
{
    bill_particular_drafts::ActiveModel {
        id: Set(Uuid::now_v7()),
        shop_id: Set(shop_id.into_inner()),
        period: Set(period.to_string()),
        kind: Set(particular.kind.into()),
        amount: Set(particular.amount),
        description: Set(particular.description),
        meter_previous: Set(charge.map(|c| c.previous)),
        meter_current: Set(charge.map(|c| c.current)),
        unit_rate: Set(charge.map(|c| c.unit_rate)),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
}

async fn find_bill_for_period<C>(
    conn: &C,
    shop_id: Uuid,
    period: BillPeriod,
) -> Result<Option<bills::Model>, DbErr>
where
    C: ConnectionTrait,
{
    bills::Entity::find()
        .filter(bills::Column::ShopId.eq(shop_id))
        .filter(bills::Column::Period.eq(period.to_string()))
        .one(conn)
        .await
}

/// A renter's unpaid and partially paid bills.
pub(crate) async fn outstanding_bill_rows<C>(
    conn: &C,
    renter_id: Uuid,
) -> Result<Vec<bills::Model>, DbErr>
where
    C: ConnectionTrait,
{
    bills::Entity::find()
        .filter(bills::Column::RenterId.eq(renter_id))
        .filter(bills::Column::Status.is_in([BillState::Unpaid, BillState::PartiallyPaid]))
        .order_by_asc(bills::Column::Period)
        .order_by_asc(bills::Column::Id)
        .lock_exclusive()
        .all(conn)
        .await
}

/// Views a bill row as an outstanding bill for allocation.
pub(crate) fn outstanding(bill: &bills::Model) -> Result<OutstandingBill, BillError> {
    Ok(OutstandingBill {
        bill_id: BillId::from_uuid(bill.id),
        period: bill.period.parse()?,
        due: bill.due_amount(),
    })
}
