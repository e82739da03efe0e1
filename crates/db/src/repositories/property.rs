//! Property repository: shops, renters and shop allocations.

use chrono::{NaiveDate, Utc};
use rentbook_core::billing::{AllocationWindow, BillPeriod, BillingError};
use rentbook_shared::AppError;
use rentbook_shared::types::{AllocationId, RenterId, ShopId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::{renters, shop_allocations, shops};

/// Error types for property operations.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    /// Shop not found.
    #[error("Shop not found: {0}")]
    ShopNotFound(Uuid),

    /// Renter not found.
    #[error("Renter not found: {0}")]
    RenterNotFound(Uuid),

    /// Allocation not found.
    #[error("Allocation not found: {0}")]
    AllocationNotFound(Uuid),

    /// Shop code already exists.
    #[error("Shop code '{0}' already exists")]
    DuplicateShopCode(String),

    /// A required field is blank.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// Monthly rent is negative.
    #[error("Monthly rent cannot be negative")]
    NegativeRent,

    /// Shop or renter is inactive.
    #[error("{0} is inactive")]
    Inactive(&'static str),

    /// The shop is already allocated for part of the requested window.
    #[error("Shop is already allocated from {start} (allocation {allocation_id})")]
    OverlappingAllocation {
        /// The clashing allocation.
        allocation_id: Uuid,
        /// Its start date.
        start: NaiveDate,
    },

    /// Allocation dates are invalid.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PropertyError> for AppError {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::ShopNotFound(_)
            | PropertyError::RenterNotFound(_)
            | PropertyError::AllocationNotFound(_) => Self::NotFound(err.to_string()),
            PropertyError::DuplicateShopCode(_) | PropertyError::OverlappingAllocation { .. } => {
                Self::Conflict(err.to_string())
            }
            PropertyError::EmptyField(_) | PropertyError::NegativeRent => {
                Self::Validation(err.to_string())
            }
            PropertyError::Inactive(_) => Self::BusinessRule(err.to_string()),
            PropertyError::Billing(e) => e.into(),
            PropertyError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a shop.
#[derive(Debug, Clone)]
pub struct CreateShopInput {
    /// Unique shop code, e.g. "G-12".
    pub code: String,
    /// Display name.
    pub name: String,
    /// Floor label.
    pub floor: Option<String>,
    /// Floor area.
    pub area_sqft: Option<Decimal>,
    /// Rent billed every month while allocated.
    pub monthly_rent: Decimal,
}

/// Input for creating a renter.
#[derive(Debug, Clone, Default)]
pub struct CreateRenterInput {
    /// Renter or business name.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Trade license number.
    pub trade_license: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Input for allocating a shop to a renter.
#[derive(Debug, Clone)]
pub struct AllocateShopInput {
    /// Shop being let.
    pub shop_id: ShopId,
    /// Renter taking the shop.
    pub renter_id: RenterId,
    /// First day of the allocation.
    pub start_date: NaiveDate,
    /// Last day, or open-ended.
    pub end_date: Option<NaiveDate>,
}

/// Property repository.
#[derive(Debug, Clone)]
pub struct PropertyRepository {
    db: DatabaseConnection,
}

impl PropertyRepository {
    /// Creates a new property repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========== Shops ==========

    /// Creates a shop.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateShopCode` if the code is taken.
    pub async fn create_shop(&self, input: CreateShopInput) -> Result<shops::Model, PropertyError> {
        let code = input.code.trim().to_string();
        if code.is_empty() {
            return Err(PropertyError::EmptyField("Shop code"));
        }
        if input.name.trim().is_empty() {
            return Err(PropertyError::EmptyField("Shop name"));
        }
        if input.monthly_rent < Decimal::ZERO {
            return Err(PropertyError::NegativeRent);
        }

        let existing = shops::Entity::find()
            .filter(shops::Column::Code.eq(code.as_str()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(PropertyError::DuplicateShopCode(code));
        }

        let now = Utc::now().into();
        let shop = shops::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code),
            name: Set(input.name.trim().to_string()),
            floor: Set(input.floor),
            area_sqft: Set(input.area_sqft),
            monthly_rent: Set(input.monthly_rent),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(shop_id = %shop.id, code = %shop.code, "Shop created");
        Ok(shop)
    }

    /// Lists shops ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_shops(&self, active_only: bool) -> Result<Vec<shops::Model>, PropertyError> {
        let mut query = shops::Entity::find();
        if active_only {
            query = query.filter(shops::Column::IsActive.eq(true));
        }
        Ok(query.order_by_asc(shops::Column::Code).all(&self.db).await?)
    }

    /// Gets a shop.
    ///
    /// # Errors
    ///
    /// Returns `ShopNotFound` if no such shop exists.
    pub async fn get_shop(&self, shop_id: ShopId) -> Result<shops::Model, PropertyError> {
        find_shop(&self.db, shop_id).await
    }

    // ========== Renters ==========

    /// Creates a renter.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` if the name is blank.
    pub async fn create_renter(
        &self,
        input: CreateRenterInput,
    ) -> Result<renters::Model, PropertyError> {
        if input.name.trim().is_empty() {
            return Err(PropertyError::EmptyField("Renter name"));
        }

        let now = Utc::now().into();
        let renter = renters::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name.trim().to_string()),
            phone: Set(input.phone),
            email: Set(input.email),
            trade_license: Set(input.trade_license),
            address: Set(input.address),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(renter_id = %renter.id, "Renter created");
        Ok(renter)
    }

    /// Lists renters ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_renters(&self, active_only: bool) -> Result<Vec<renters::Model>, PropertyError> {
        let mut query = renters::Entity::find();
        if active_only {
            query = query.filter(renters::Column::IsActive.eq(true));
        }
        Ok(query.order_by_asc(renters::Column::Name).all(&self.db).await?)
    }

    /// Gets a renter.
    ///
    /// # Errors
    ///
    /// Returns `RenterNotFound` if no such renter exists.
    pub async fn get_renter(&self, renter_id: RenterId) -> Result<renters::Model, PropertyError> {
        find_renter(&self.db, renter_id).await
    }

    // ========== Allocations ==========

    /// Allocates a shop to a renter for a window of dates.
    ///
    /// # Errors
    ///
    /// Returns `OverlappingAllocation` if the shop is already let for any
    /// day of the window, or `Billing` if the window ends before it starts.
    pub async fn allocate_shop(
        &self,
        input: AllocateShopInput,
    ) -> Result<shop_allocations::Model, PropertyError> {
        let window = AllocationWindow::new(input.start_date, input.end_date)?;

        let txn = self.db.begin().await?;

        let shop = find_shop(&txn, input.shop_id).await?;
        if !shop.is_active {
            return Err(PropertyError::Inactive("Shop"));
        }
        let renter = find_renter(&txn, input.renter_id).await?;
        if !renter.is_active {
            return Err(PropertyError::Inactive("Renter"));
        }

        let existing = shop_allocations::Entity::find()
            .filter(shop_allocations::Column::ShopId.eq(shop.id))
            .all(&txn)
            .await?;
        if let Some(clash) = existing.iter().find(|a| window_of(a).overlaps(&window)) {
            warn!(
                shop_id = %shop.id,
                clash = %clash.id,
                "Allocation rejected: overlapping window"
            );
            return Err(PropertyError::OverlappingAllocation {
                allocation_id: clash.id,
                start: clash.start_date,
            });
        }

        let now = Utc::now().into();
        let allocation = shop_allocations::ActiveModel {
            id: Set(AllocationId::new().into_inner()),
            shop_id: Set(shop.id),
            renter_id: Set(renter.id),
            start_date: Set(window.start),
            end_date: Set(window.end),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            allocation_id = %allocation.id,
            shop_id = %allocation.shop_id,
            renter_id = %allocation.renter_id,
            start = %allocation.start_date,
            "Shop allocated"
        );
        Ok(allocation)
    }

    /// Closes an allocation on `end_date`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationNotFound` for unknown ids, `Billing` if the end
    /// precedes the start, or `OverlappingAllocation` if moving an earlier
    /// end date later would run into the shop's next allocation.
    pub async fn end_allocation(
        &self,
        allocation_id: AllocationId,
        end_date: NaiveDate,
    ) -> Result<shop_allocations::Model, PropertyError> {
        let txn = self.db.begin().await?;

        let allocation = shop_allocations::Entity::find_by_id(allocation_id.into_inner())
            .one(&txn)
            .await?
            .ok_or(PropertyError::AllocationNotFound(allocation_id.into_inner()))?;
        let window = AllocationWindow::new(allocation.start_date, Some(end_date))?;

        let others = shop_allocations::Entity::find()
            .filter(shop_allocations::Column::ShopId.eq(allocation.shop_id))
            .filter(shop_allocations::Column::Id.ne(allocation.id))
            .all(&txn)
            .await?;
        if let Some(clash) = others.iter().find(|a| window_of(a).overlaps(&window)) {
            return Err(PropertyError::OverlappingAllocation {
                allocation_id: clash.id,
                start: clash.start_date,
            });
        }

        let mut active: shop_allocations::ActiveModel = allocation.into();
        active.end_date = Set(Some(end_date));
        active.updated_at = Set(Utc::now().into());
        let allocation = active.update(&txn).await?;

        txn.commit().await?;

        info!(allocation_id = %allocation.id, end = %end_date, "Allocation ended");
        Ok(allocation)
    }

    /// Gets the allocation in force for a shop on a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn active_allocation(
        &self,
        shop_id: ShopId,
        date: NaiveDate,
    ) -> Result<Option<shop_allocations::Model>, PropertyError> {
        let allocation = shop_allocations::Entity::find()
            .filter(shop_allocations::Column::ShopId.eq(shop_id.into_inner()))
            .filter(shop_allocations::Column::StartDate.lte(date))
            .filter(
                Condition::any()
                    .add(shop_allocations::Column::EndDate.is_null())
                    .add(shop_allocations::Column::EndDate.gte(date)),
            )
            .one(&self.db)
            .await?;
        Ok(allocation)
    }

    /// Lists allocations in force on any day of a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn allocations_for_period(
        &self,
        period: BillPeriod,
    ) -> Result<Vec<shop_allocations::Model>, PropertyError> {
        allocations_for_period(&self.db, period).await
    }
}

fn window_of(allocation: &shop_allocations::Model) -> AllocationWindow {
    AllocationWindow {
        start: allocation.start_date,
        end: allocation.end_date,
    }
}

pub(crate) async fn find_shop<C>(conn: &C, shop_id: ShopId) -> Result<shops::Model, PropertyError>
where
    C: ConnectionTrait,
{
    shops::Entity::find_by_id(shop_id.into_inner())
        .one(conn)
        .await?
        .ok_or(PropertyError::ShopNotFound(shop_id.into_inner()))
}

pub(crate) async fn find_renter<C>(
    conn: &C,
    renter_id: RenterId,
) -> Result<renters::Model, PropertyError>
where
    C: ConnectionTrait,
{
    renters::Entity::find_by_id(renter_id.into_inner())
        .one(conn)
        .await?
        .ok_or(PropertyError::RenterNotFound(renter_id.into_inner()))
}

pub(crate) async fn allocations_for_period<C>(
    conn: &C,
    period: BillPeriod,
) -> Result<Vec<shop_allocations::Model>, PropertyError>
where
    C: ConnectionTrait,
{
    let allocations = shop_allocations::Entity::find()
        .filter(shop_allocations::Column::StartDate.lte(period.last_day()))
        .filter(
            Condition::any()
                .add(shop_allocations::Column::EndDate.is_null())
                .add(shop_allocations::Column::EndDate.gte(period.first_day())),
        )
        .order_by_asc(shop_allocations::Column::ShopId)
        .order_by_asc(shop_allocations::Column::StartDate)
        .all(conn)
        .await?;
    Ok(allocations)
}
