//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every write that touches the books goes through [`ledger::post_lines`].

pub mod billing;
pub mod collection;
pub mod head;
pub mod ledger;
pub mod property;
pub mod tenant;
pub mod voucher;

pub use billing::{
    BillDetail, BillError, BillFilter, BillingRepository, GenerateBillsInput, GenerationReport,
    SkipReason, SkippedShop, StageMeterInput, StageParticularInput,
};
pub use collection::{
    CollectionDetail, CollectionRepoError, CollectionRepository, SaveCollectionInput, Withholding,
};
pub use head::{CreateHeadInput, HeadError, HeadFilter, HeadRepository};
pub use ledger::{
    BalanceMismatch, LedgerRepository, PostingError, PostingRequest, VerifyReport, post_lines,
};
pub use property::{
    AllocateShopInput, CreateRenterInput, CreateShopInput, PropertyError, PropertyRepository,
};
pub use tenant::{TenantError, TenantRepository};
pub use voucher::{CreateVoucherInput, VoucherDetail, VoucherError, VoucherRepository};

use sea_orm::{DbErr, SqlErr};

/// True when an insert lost a race on a unique index.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::shops;
    use crate::migration::{Migrator, MigratorTrait};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, Database, Set};
    use uuid::Uuid;

    fn shop(code: &str) -> shops::ActiveModel {
        let now = Utc::now().into();
        shops::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code.to_string()),
            name: Set("Corner shop".to_string()),
            floor: Set(None),
            area_sqft: Set(None),
            monthly_rent: Set(Decimal::ZERO),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    #[tokio::test]
    async fn test_unique_index_violation_is_recognised() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        shop("G-01").insert(&db).await.unwrap();
        let err = shop("G-01").insert(&db).await.unwrap_err();
        assert!(is_unique_violation(&err));
        assert!(!is_unique_violation(&DbErr::Custom("other".to_string())));
    }
}
