//! Shared fixtures for the database integration tests.
//!
//! Every test gets its own in-memory SQLite database with the full schema
//! and the system chart of accounts.

#![allow(dead_code)]

use chrono::NaiveDate;
use rentbook_core::ledger::PostingHeads;
use rentbook_db::migration::{Migrator, MigratorTrait};
use rentbook_db::repositories::{
    AllocateShopInput, CreateRenterInput, CreateShopInput, HeadRepository, PropertyRepository,
};
use rentbook_shared::types::{HeadId, RenterId, ShopId};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};

/// A shop let to a renter.
pub struct Tenancy {
    pub shop_id: ShopId,
    pub renter_id: RenterId,
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Fresh database with the schema and system heads in place.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    HeadRepository::new(db.clone())
        .ensure_system_heads()
        .await
        .unwrap();
    db
}

pub async fn posting_heads(db: &DatabaseConnection) -> PostingHeads {
    HeadRepository::new(db.clone()).posting_heads().await.unwrap()
}

pub async fn head_id(db: &DatabaseConnection, code: &str) -> HeadId {
    let head = HeadRepository::new(db.clone())
        .find_by_code(code)
        .await
        .unwrap()
        .unwrap();
    HeadId::from_uuid(head.id)
}

/// Creates a shop with the given rent and lets it from `start` onwards.
pub async fn let_shop(
    db: &DatabaseConnection,
    code: &str,
    monthly_rent: Decimal,
    start: NaiveDate,
) -> Tenancy {
    let property = PropertyRepository::new(db.clone());
    let shop = property
        .create_shop(CreateShopInput {
            code: code.to_string(),
            name: format!("Shop {code}"),
            floor: Some("Ground".to_string()),
            area_sqft: None,
            monthly_rent,
        })
        .await
        .unwrap();
    let renter = property
        .create_renter(CreateRenterInput {
            name: format!("Renter of {code}"),
            phone: Some("01700000000".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let shop_id = ShopId::from_uuid(shop.id);
    let renter_id = RenterId::from_uuid(renter.id);
    property
        .allocate_shop(AllocateShopInput {
            shop_id,
            renter_id,
            start_date: start,
            end_date: None,
        })
        .await
        .unwrap();
    Tenancy { shop_id, renter_id }
}
