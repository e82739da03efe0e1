//! Database seeder for Rentbook development and testing.
//!
//! Seeds the system chart of accounts and, on an empty database, a few
//! demo shops let to demo renters from the start of the current month.
//! Running it again is harmless.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, Utc};
use rentbook_core::billing::{BillPeriod, ParticularKind};
use rentbook_db::repositories::{
    AllocateShopInput, BillingRepository, CreateRenterInput, CreateShopInput, HeadRepository,
    PropertyRepository, StageMeterInput,
};
use rentbook_shared::types::{RenterId, ShopId};
use rust_decimal::Decimal;

/// Demo shops: code, name, floor, monthly rent.
const DEMO_SHOPS: [(&str, &str, &str, i64); 3] = [
    ("G-01", "Ground floor corner", "Ground", 25_000),
    ("G-02", "Ground floor inner", "Ground", 18_000),
    ("1-01", "First floor front", "First", 15_000),
];

/// Demo renters, one per demo shop.
const DEMO_RENTERS: [(&str, &str); 3] = [
    ("Karim Traders", "01711000001"),
    ("Nabila Fashion", "01711000002"),
    ("Rahman Pharmacy", "01711000003"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    println!("Connecting to database...");
    let db = rentbook_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding system heads...");
    let created = HeadRepository::new(db.clone()).ensure_system_heads().await?;
    println!("  {created} heads created");

    let property = PropertyRepository::new(db.clone());
    if !property.list_shops(false).await?.is_empty() {
        println!("Shops already exist, skipping demo data.");
        println!("Seeding complete!");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let period = BillPeriod::containing(today);
    let billing = BillingRepository::new(db.clone());

    println!("Seeding demo shops and renters...");
    for ((code, name, floor, rent), (renter_name, phone)) in DEMO_SHOPS.into_iter().zip(DEMO_RENTERS) {
        let shop = property
            .create_shop(CreateShopInput {
                code: code.to_string(),
                name: name.to_string(),
                floor: Some(floor.to_string()),
                area_sqft: None,
                monthly_rent: Decimal::from(rent),
            })
            .await?;
        let renter = property
            .create_renter(CreateRenterInput {
                name: renter_name.to_string(),
                phone: Some(phone.to_string()),
                ..Default::default()
            })
            .await?;

        let shop_id = ShopId::from_uuid(shop.id);
        property
            .allocate_shop(AllocateShopInput {
                shop_id,
                renter_id: RenterId::from_uuid(renter.id),
                start_date: period.first_day(),
                end_date: None,
            })
            .await?;

        billing
            .stage_meter_particular(StageMeterInput {
                shop_id,
                period,
                kind: ParticularKind::Electricity,
                previous: Some(Decimal::ZERO),
                current: Decimal::from(100 + today.day()),
                unit_rate: Decimal::new(85, 1),
                description: None,
            })
            .await?;
        println!("  {code} let to {renter_name}");
    }

    println!("Seeding complete! Generate {period} bills with POST /api/v1/bills/generate");
    Ok(())
}
