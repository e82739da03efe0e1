//! Concurrent posting tests.
//!
//! Many vouchers hitting the same head at once must leave its stored
//! balance equal to the sum of its journal rows.

mod common;

use common::{date, head_id, let_shop, posting_heads, setup_db};
use futures::future::join_all;
use rentbook_core::ledger::{DepositAccount, DrCr, PostingLine};
use rentbook_db::entities::sea_orm_active_enums::VoucherType;
use rentbook_db::entities::tenant_trans_history;
use rentbook_db::repositories::head::{MAINTENANCE_EXPENSE, OWNER_CAPITAL};
use rentbook_db::repositories::{
    CollectionRepository, CreateVoucherInput, LedgerRepository, SaveCollectionInput,
    TenantRepository, VoucherError, VoucherRepository, Withholding,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

const POSTINGS: u32 = 50;

#[tokio::test]
async fn test_concurrent_postings_keep_balance_consistent() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let maintenance = head_id(&db, MAINTENANCE_EXPENSE).await;
    let vouchers = VoucherRepository::new(db.clone());

    let tasks = (0..POSTINGS).map(|i| {
        let vouchers = vouchers.clone();
        // Every fifth voucher pays out instead of receiving.
        let (voucher_type, lines) = if i % 5 == 4 {
            (
                VoucherType::Payment,
                vec![
                    PostingLine::debit(maintenance, dec!(10)),
                    PostingLine::credit(heads.cash, dec!(10)),
                ],
            )
        } else {
            (
                VoucherType::Receipt,
                vec![
                    PostingLine::debit(heads.cash, dec!(10)),
                    PostingLine::credit(capital, dec!(10)),
                ],
            )
        };
        async move {
            vouchers
                .create_voucher(CreateVoucherInput {
                    voucher_type,
                    voucher_date: date(2026, 2, 1 + i % 28),
                    narration: format!("concurrent {i}"),
                    reference: Some(format!("CC-{i:03}")),
                    lines,
                })
                .await
        }
    });

    let results = join_all(tasks).await;
    assert!(results.iter().all(Result::is_ok));

    let ledger = LedgerRepository::new(db.clone());
    let cash = ledger.get_ledger_balance(heads.cash, None).await.unwrap();
    let payments = Decimal::from(POSTINGS / 5);
    let receipts = Decimal::from(POSTINGS) - payments;
    assert_eq!(cash.dr_cr, DrCr::Dr);
    assert_eq!(cash.amount, (receipts - payments) * dec!(10));

    let report = ledger.verify().await.unwrap();
    assert!(report.is_consistent());
    assert_eq!(report.journal_debit, Decimal::from(POSTINGS) * dec!(10));
}

#[tokio::test]
async fn test_concurrent_duplicate_references_post_once() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let vouchers = VoucherRepository::new(db.clone());

    let tasks = (0..5).map(|_| {
        let vouchers = vouchers.clone();
        async move {
            vouchers
                .create_voucher(CreateVoucherInput {
                    voucher_type: VoucherType::Receipt,
                    voucher_date: date(2026, 2, 1),
                    narration: "retried receipt".to_string(),
                    reference: Some("RV-RETRY".to_string()),
                    lines: vec![
                        PostingLine::debit(heads.cash, dec!(25)),
                        PostingLine::credit(capital, dec!(25)),
                    ],
                })
                .await
        }
    });

    let results = join_all(tasks).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|err| matches!(err, VoucherError::DuplicateReference(r) if r == "RV-RETRY"))
    );

    let ledger = LedgerRepository::new(db.clone());
    let cash = ledger.get_ledger_balance(heads.cash, None).await.unwrap();
    assert_eq!(cash.amount, dec!(25));
    assert!(ledger.verify().await.unwrap().is_consistent());
}

#[tokio::test]
async fn test_concurrent_advances_keep_tenant_running_balance() {
    let db = setup_db().await;
    let tenancy = let_shop(&db, "K-1", dec!(0), date(2026, 2, 1)).await;
    let renter_id = tenancy.renter_id;
    let collections = CollectionRepository::new(db.clone());

    let tasks = (0..10).map(|i| {
        let collections = collections.clone();
        async move {
            collections
                .save_collection(SaveCollectionInput {
                    renter_id,
                    collected_on: date(2026, 2, 1),
                    gross: dec!(100),
                    withholding: Withholding::NONE,
                    deposit: DepositAccount::Cash,
                    reference: Some(format!("ADV-{i}")),
                    remarks: None,
                })
                .await
        }
    });
    let results = join_all(tasks).await;
    assert!(results.iter().all(Result::is_ok));

    let rows = tenant_trans_history::Entity::find()
        .filter(tenant_trans_history::Column::RenterId.eq(renter_id.into_inner()))
        .order_by_asc(tenant_trans_history::Column::CreatedAt)
        .order_by_asc(tenant_trans_history::Column::Id)
        .all(&db)
        .await
        .unwrap();
    assert_eq!(rows.len(), 10);
    let mut expected = Decimal::ZERO;
    for row in &rows {
        expected -= dec!(100);
        assert_eq!(row.balance, expected);
    }

    let balance = TenantRepository::new(db.clone())
        .balance(renter_id)
        .await
        .unwrap();
    assert_eq!(balance, dec!(-1000));
}

#[tokio::test]
async fn test_concurrent_opposite_line_orders_all_post() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let vouchers = VoucherRepository::new(db.clone());

    let tasks = (0..20u32).map(|i| {
        let vouchers = vouchers.clone();
        // Alternate which head leads the lines.
        let lines = if i % 2 == 0 {
            vec![
                PostingLine::debit(heads.cash, dec!(30)),
                PostingLine::credit(capital, dec!(30)),
            ]
        } else {
            vec![
                PostingLine::debit(capital, dec!(10)),
                PostingLine::credit(heads.cash, dec!(10)),
            ]
        };
        async move {
            vouchers
                .create_voucher(CreateVoucherInput {
                    voucher_type: VoucherType::Journal,
                    voucher_date: date(2026, 5, 1),
                    narration: format!("swap {i}"),
                    reference: None,
                    lines,
                })
                .await
        }
    });

    let results = join_all(tasks).await;
    assert!(results.iter().all(Result::is_ok));

    let ledger = LedgerRepository::new(db.clone());
    let cash = ledger.get_ledger_balance(heads.cash, None).await.unwrap();
    assert_eq!((cash.dr_cr, cash.amount), (DrCr::Dr, dec!(200)));
    let snapshot = ledger
        .get_ledger_balance(heads.cash, Some(date(2026, 5, 1)))
        .await
        .unwrap();
    assert_eq!(snapshot, cash);
    assert!(ledger.verify().await.unwrap().is_consistent());
}
