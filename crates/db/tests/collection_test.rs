//! Collection tests: FIFO settlement, withholding, advances and idempotency.

mod common;

use common::{Tenancy, date, let_shop, posting_heads, setup_db};
use rentbook_core::billing::{BillPeriod, BillStatus};
use rentbook_core::collection::CollectionError;
use rentbook_core::ledger::{DepositAccount, DrCr};
use rentbook_db::entities::sea_orm_active_enums::BillState;
use rentbook_db::repositories::{
    BillError, BillFilter, BillingRepository, CollectionRepoError, CollectionRepository,
    GenerateBillsInput, LedgerRepository, SaveCollectionInput, TenantRepository, Withholding,
};
use rentbook_shared::types::{BillId, CollectionId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;

/// Bills November, December and January at 1000 each.
async fn three_months_billed(db: &DatabaseConnection) -> Tenancy {
    let tenancy = let_shop(db, "C-1", dec!(1000), date(2025, 11, 1)).await;
    let billing = BillingRepository::new(db.clone());
    for (year, month) in [(2025, 11), (2025, 12), (2026, 1)] {
        let period = BillPeriod::new(year, month).unwrap();
        billing
            .generate_bills(GenerateBillsInput {
                period,
                bill_date: period.first_day(),
                due_day: 10,
            })
            .await
            .unwrap();
    }
    tenancy
}

fn collection(tenancy: &Tenancy, gross: Decimal, withholding: Withholding) -> SaveCollectionInput {
    SaveCollectionInput {
        renter_id: tenancy.renter_id,
        collected_on: date(2026, 1, 15),
        gross,
        withholding,
        deposit: DepositAccount::Cash,
        reference: None,
        remarks: None,
    }
}

async fn bills_by_period(db: &DatabaseConnection, tenancy: &Tenancy) -> Vec<(String, BillState, Decimal)> {
    let mut bills = BillingRepository::new(db.clone())
        .list_bills(BillFilter {
            renter_id: Some(tenancy.renter_id),
            ..Default::default()
        })
        .await
        .unwrap();
    bills.sort_by(|a, b| a.period.cmp(&b.period));
    bills
        .into_iter()
        .map(|bill| (bill.period, bill.status, bill.paid_amount))
        .collect()
}

#[tokio::test]
async fn test_collection_settles_oldest_bills_first_with_tds() {
    let db = setup_db().await;
    let tenancy = three_months_billed(&db).await;
    let collections = CollectionRepository::new(db.clone());

    let saved = collections
        .save_collection(collection(
            &tenancy,
            dec!(2500),
            Withholding::Rates {
                tds_rate: dec!(0.05),
                vat_rate: dec!(0),
            },
        ))
        .await
        .unwrap();
    assert_eq!(saved.collection.tds_amount, dec!(125));
    assert_eq!(saved.collection.net_amount, dec!(2375));
    assert_eq!(saved.collection.applied_amount, dec!(2500));
    assert_eq!(saved.collection.unapplied_amount, dec!(0));
    assert_eq!(saved.allocations.len(), 3);

    assert_eq!(
        bills_by_period(&db, &tenancy).await,
        vec![
            ("2025-11".to_string(), BillState::Paid, dec!(1000)),
            ("2025-12".to_string(), BillState::Paid, dec!(1000)),
            ("2026-01".to_string(), BillState::PartiallyPaid, dec!(500)),
        ]
    );

    let heads = posting_heads(&db).await;
    let ledger = LedgerRepository::new(db.clone());
    let cash = ledger.get_ledger_balance(heads.cash, None).await.unwrap();
    assert_eq!((cash.dr_cr, cash.amount), (DrCr::Dr, dec!(2375)));
    let tds = ledger.get_ledger_balance(heads.tds_receivable, None).await.unwrap();
    assert_eq!(tds.amount, dec!(125));
    let receivable = ledger.get_ledger_balance(heads.receivable, None).await.unwrap();
    assert_eq!((receivable.dr_cr, receivable.amount), (DrCr::Dr, dec!(500)));

    let outstanding = BillingRepository::new(db.clone())
        .outstanding_bills(tenancy.renter_id)
        .await
        .unwrap();
    assert_eq!(outstanding.len(), 1);
    assert_eq!(outstanding[0].due, dec!(500));

    let balance = TenantRepository::new(db.clone())
        .balance(tenancy.renter_id)
        .await
        .unwrap();
    assert_eq!(balance, dec!(500));
}

#[tokio::test]
async fn test_overpayment_becomes_tenant_advance() {
    let db = setup_db().await;
    let tenancy = three_months_billed(&db).await;
    let collections = CollectionRepository::new(db.clone());

    let mut input = collection(&tenancy, dec!(3300), Withholding::NONE);
    input.deposit = DepositAccount::Bank;
    let saved = collections.save_collection(input).await.unwrap();
    assert_eq!(saved.collection.applied_amount, dec!(3000));
    assert_eq!(saved.collection.unapplied_amount, dec!(300));

    let heads = posting_heads(&db).await;
    let ledger = LedgerRepository::new(db.clone());
    let advance = ledger
        .get_ledger_balance(heads.advance_from_tenants, None)
        .await
        .unwrap();
    assert_eq!((advance.dr_cr, advance.amount), (DrCr::Cr, dec!(300)));
    let bank = ledger.get_ledger_balance(heads.bank, None).await.unwrap();
    assert_eq!(bank.amount, dec!(3300));
    assert!(ledger.get_ledger_balance(heads.receivable, None).await.unwrap().is_zero());

    let tenant = TenantRepository::new(db.clone());
    assert_eq!(tenant.balance(tenancy.renter_id).await.unwrap(), dec!(-300));

    let statement = tenant
        .statement(tenancy.renter_id, date(2025, 12, 1), date(2026, 1, 31))
        .await
        .unwrap();
    assert_eq!(statement.opening_balance, dec!(1000));
    assert_eq!(statement.lines.len(), 3);
    assert_eq!(statement.closing_balance, dec!(-300));

    let tb = ledger.get_trial_balance(None).await.unwrap();
    assert!(tb.is_balanced);
    assert!(ledger.verify().await.unwrap().is_consistent());
}

#[tokio::test]
async fn test_duplicate_reference_is_rejected() {
    let db = setup_db().await;
    let tenancy = three_months_billed(&db).await;
    let collections = CollectionRepository::new(db.clone());

    let mut input = collection(&tenancy, dec!(500), Withholding::NONE);
    input.reference = Some("MR-0001".to_string());
    let first = collections.save_collection(input.clone()).await.unwrap();

    let err = collections.save_collection(input).await.unwrap_err();
    assert!(matches!(err, CollectionRepoError::DuplicateReference(ref r) if r == "MR-0001"));

    let listed = collections.list_collections(tenancy.renter_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    let fetched = collections
        .get_collection(CollectionId::from_uuid(first.collection.id))
        .await
        .unwrap();
    assert_eq!(fetched.allocations.len(), 1);
    assert_eq!(fetched.allocations[0].amount, dec!(500));
}

#[tokio::test]
async fn test_invalid_amounts_are_rejected() {
    let db = setup_db().await;
    let tenancy = three_months_billed(&db).await;
    let collections = CollectionRepository::new(db.clone());

    let err = collections
        .save_collection(collection(&tenancy, dec!(0), Withholding::NONE))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CollectionRepoError::Collection(CollectionError::NonPositiveAmount(_))
    ));

    let err = collections
        .save_collection(collection(
            &tenancy,
            dec!(100),
            Withholding::Amounts {
                tds: dec!(80),
                vat: dec!(30),
            },
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CollectionRepoError::Collection(CollectionError::WithholdingExceedsGross { .. })
    ));
    assert!(collections.list_collections(tenancy.renter_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_paid_bill_cannot_be_voided() {
    let db = setup_db().await;
    let tenancy = three_months_billed(&db).await;
    CollectionRepository::new(db.clone())
        .save_collection(collection(&tenancy, dec!(1000), Withholding::NONE))
        .await
        .unwrap();

    let billing = BillingRepository::new(db.clone());
    let paid = billing
        .list_bills(BillFilter {
            status: Some(BillStatus::Paid),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].period, "2025-11");

    let err = billing
        .void_bill(BillId::from_uuid(paid[0].id), date(2026, 1, 20), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BillError::CannotVoid {
            status: BillStatus::Paid,
            ..
        }
    ));
}
