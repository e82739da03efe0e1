//! Head of account repository.
//!
//! Manages the chart of heads and the system heads that bill, collection
//! and voucher postings are routed to.

use chrono::Utc;
use rentbook_core::ledger::{HeadType, PostingHeads};
use rentbook_shared::AppError;
use rentbook_shared::types::HeadId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::{heads_of_accounts, sea_orm_active_enums::HeadCategory};

/// Code of the cash in hand head.
pub const CASH: &str = "1000";
/// Code of the bank head.
pub const BANK: &str = "1010";
/// Code of the tenant receivable head.
pub const TENANT_RECEIVABLE: &str = "1100";
/// Code of the TDS receivable head.
pub const TDS_RECEIVABLE: &str = "1200";
/// Code of the VAT receivable head.
pub const VAT_RECEIVABLE: &str = "1210";
/// Code of the advance from tenants head.
pub const ADVANCE_FROM_TENANTS: &str = "2100";
/// Code of the owner's capital head.
pub const OWNER_CAPITAL: &str = "3000";
/// Code of the rent revenue head.
pub const RENT_REVENUE: &str = "4000";
/// Code of the electricity revenue head.
pub const ELECTRICITY_REVENUE: &str = "4010";
/// Code of the gas revenue head.
pub const GAS_REVENUE: &str = "4020";
/// Code of the WASA revenue head.
pub const WASA_REVENUE: &str = "4030";
/// Code of the internet revenue head.
pub const INTERNET_REVENUE: &str = "4040";
/// Code of the maintenance expense head.
pub const MAINTENANCE_EXPENSE: &str = "5000";

/// The system chart: heads every installation needs.
pub const SYSTEM_HEADS: [(&str, &str, HeadType); 13] = [
    (CASH, "Cash in Hand", HeadType::Asset),
    (BANK, "Bank", HeadType::Asset),
    (TENANT_RECEIVABLE, "Tenant Receivable", HeadType::Asset),
    (TDS_RECEIVABLE, "TDS Receivable", HeadType::Asset),
    (VAT_RECEIVABLE, "VAT Receivable", HeadType::Asset),
    (ADVANCE_FROM_TENANTS, "Advance from Tenants", HeadType::Liability),
    (OWNER_CAPITAL, "Owner's Capital", HeadType::Equity),
    (RENT_REVENUE, "Rent Revenue", HeadType::Revenue),
    (ELECTRICITY_REVENUE, "Electricity Revenue", HeadType::Revenue),
    (GAS_REVENUE, "Gas Revenue", HeadType::Revenue),
    (WASA_REVENUE, "WASA Revenue", HeadType::Revenue),
    (INTERNET_REVENUE, "Internet Revenue", HeadType::Revenue),
    (MAINTENANCE_EXPENSE, "Maintenance Expense", HeadType::Expense),
];

/// Error types for head operations.
#[derive(Debug, thiserror::Error)]
pub enum HeadError {
    /// Head code already exists.
    #[error("Head code '{0}' already exists")]
    DuplicateCode(String),

    /// Head code or name is blank.
    #[error("Head {0} cannot be empty")]
    EmptyField(&'static str),

    /// Head not found.
    #[error("Head of account not found: {0}")]
    NotFound(String),

    /// System heads cannot be deactivated.
    #[error("System head '{0}' cannot be deactivated")]
    SystemHead(String),

    /// A system head required for posting is missing or inactive.
    #[error("System head '{0}' is missing or inactive; run the seeder")]
    SystemHeadMissing(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<HeadError> for AppError {
    fn from(err: HeadError) -> Self {
        match err {
            HeadError::DuplicateCode(_) => Self::Conflict(err.to_string()),
            HeadError::EmptyField(_) => Self::Validation(err.to_string()),
            HeadError::NotFound(_) => Self::NotFound(err.to_string()),
            HeadError::SystemHead(_) => Self::BusinessRule(err.to_string()),
            HeadError::SystemHeadMissing(_) => Self::Internal(err.to_string()),
            HeadError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a head.
#[derive(Debug, Clone)]
pub struct CreateHeadInput {
    /// Unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Head type.
    pub head_type: HeadType,
    /// Optional description.
    pub description: Option<String>,
}

/// Filter options for listing heads.
#[derive(Debug, Clone, Default)]
pub struct HeadFilter {
    /// Only heads of this type.
    pub head_type: Option<HeadType>,
    /// Only active (true) or inactive (false) heads.
    pub is_active: Option<bool>,
}

/// Head of account repository.
#[derive(Debug, Clone)]
pub struct HeadRepository {
    db: DatabaseConnection,
}

impl HeadRepository {
    /// Creates a new head repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a head.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCode` if the code is taken.
    pub async fn create(&self, input: CreateHeadInput) -> Result<heads_of_accounts::Model, HeadError> {
        let code = input.code.trim().to_string();
        let name = input.name.trim().to_string();
        if code.is_empty() {
            return Err(HeadError::EmptyField("code"));
        }
        if name.is_empty() {
            return Err(HeadError::EmptyField("name"));
        }
        if self.find_by_code(&code).await?.is_some() {
            warn!(code = %code, "Head creation rejected: duplicate code");
            return Err(HeadError::DuplicateCode(code));
        }

        let now = Utc::now().into();
        let head = heads_of_accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code),
            name: Set(name),
            head_type: Set(input.head_type.into()),
            description: Set(input.description),
            is_system: Set(false),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(head_id = %head.id, code = %head.code, "Head of account created");
        Ok(head)
    }

    /// Lists heads ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: HeadFilter) -> Result<Vec<heads_of_accounts::Model>, HeadError> {
        let mut query = heads_of_accounts::Entity::find();
        if let Some(head_type) = filter.head_type {
            query = query.filter(heads_of_accounts::Column::HeadType.eq(HeadCategory::from(head_type)));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(heads_of_accounts::Column::IsActive.eq(is_active));
        }

        let heads = query
            .order_by_asc(heads_of_accounts::Column::Code)
            .all(&self.db)
            .await?;
        Ok(heads)
    }

    /// Finds a head by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such head exists.
    pub async fn find(&self, head_id: HeadId) -> Result<heads_of_accounts::Model, HeadError> {
        heads_of_accounts::Entity::find_by_id(head_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| HeadError::NotFound(head_id.to_string()))
    }

    /// Finds a head by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<heads_of_accounts::Model>, HeadError> {
        let head = heads_of_accounts::Entity::find()
            .filter(heads_of_accounts::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        Ok(head)
    }

    /// Deactivates a head so no further postings can reach it.
    ///
    /// # Errors
    ///
    /// Returns `SystemHead` for system heads and `NotFound` for unknown ids.
    pub async fn deactivate(&self, head_id: HeadId) -> Result<heads_of_accounts::Model, HeadError> {
        let head = self.find(head_id).await?;
        if head.is_system {
            warn!(code = %head.code, "Deactivation rejected: system head");
            return Err(HeadError::SystemHead(head.code));
        }

        let mut active: heads_of_accounts::ActiveModel = head.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        let head = active.update(&self.db).await?;

        info!(code = %head.code, "Head of account deactivated");
        Ok(head)
    }

    /// Creates any missing system heads. Safe to run repeatedly.
    ///
    /// Returns the number of heads created.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn ensure_system_heads(&self) -> Result<usize, HeadError> {
        let mut created = 0;
        for (code, name, head_type) in SYSTEM_HEADS {
            if self.find_by_code(code).await?.is_some() {
                continue;
            }
            let now = Utc::now().into();
            heads_of_accounts::ActiveModel {
                id: Set(Uuid::now_v7()),
                code: Set(code.to_string()),
                name: Set(name.to_string()),
                head_type: Set(head_type.into()),
                description: Set(None),
                is_system: Set(true),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await?;
            created += 1;
        }

        if created > 0 {
            info!(created, "System heads seeded");
        }
        Ok(created)
    }

    /// Resolves the heads that postings are routed to.
    ///
    /// # Errors
    ///
    /// Returns `SystemHeadMissing` if a system head is absent or inactive.
    pub async fn posting_heads(&self) -> Result<PostingHeads, HeadError> {
        let heads = heads_of_accounts::Entity::find()
            .filter(heads_of_accounts::Column::IsSystem.eq(true))
            .filter(heads_of_accounts::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;

        let resolve = |code: &'static str| {
            heads
                .iter()
                .find(|head| head.code == code)
                .map(|head| HeadId::from_uuid(head.id))
                .ok_or(HeadError::SystemHeadMissing(code))
        };

        Ok(PostingHeads {
            receivable: resolve(TENANT_RECEIVABLE)?,
            cash: resolve(CASH)?,
            bank: resolve(BANK)?,
            tds_receivable: resolve(TDS_RECEIVABLE)?,
            vat_receivable: resolve(VAT_RECEIVABLE)?,
            rent_revenue: resolve(RENT_REVENUE)?,
            electricity_revenue: resolve(ELECTRICITY_REVENUE)?,
            gas_revenue: resolve(GAS_REVENUE)?,
            wasa_revenue: resolve(WASA_REVENUE)?,
            internet_revenue: resolve(INTERNET_REVENUE)?,
            advance_from_tenants: resolve(ADVANCE_FROM_TENANTS)?,
        })
    }
}
