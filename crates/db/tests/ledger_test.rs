//! Posting engine tests: balances, snapshots, validation and reconciliation.

mod common;

use common::{date, head_id, posting_heads, setup_db};
use rentbook_core::ledger::{DocumentRef, DrCr, LedgerBalance, LedgerError, PostingLine};
use rentbook_db::entities::{account_journal, vouchers};
use rentbook_db::entities::sea_orm_active_enums::VoucherType;
use rentbook_db::repositories::head::{MAINTENANCE_EXPENSE, OWNER_CAPITAL};
use rentbook_db::repositories::{
    CreateHeadInput, CreateVoucherInput, HeadRepository, LedgerRepository, PostingError,
    VoucherError, VoucherRepository,
};
use rentbook_core::ledger::HeadType;
use rentbook_shared::types::{HeadId, VoucherId};
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};

fn journal(head_dr: HeadId, head_cr: HeadId, amount: rust_decimal::Decimal) -> Vec<PostingLine> {
    vec![
        PostingLine::debit(head_dr, amount),
        PostingLine::credit(head_cr, amount),
    ]
}

async fn post(
    vouchers: &VoucherRepository,
    voucher_type: VoucherType,
    on: chrono::NaiveDate,
    lines: Vec<PostingLine>,
) -> VoucherId {
    let detail = vouchers
        .create_voucher(CreateVoucherInput {
            voucher_type,
            voucher_date: on,
            narration: "test posting".to_string(),
            reference: None,
            lines,
        })
        .await
        .unwrap();
    VoucherId::from_uuid(detail.voucher.id)
}

#[tokio::test]
async fn test_posting_moves_current_balances() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let vouchers = VoucherRepository::new(db.clone());
    let ledger = LedgerRepository::new(db.clone());

    let voucher_id = post(
        &vouchers,
        VoucherType::Receipt,
        date(2026, 1, 5),
        journal(heads.cash, capital, dec!(5000)),
    )
    .await;

    let cash = ledger.get_ledger_balance(heads.cash, None).await.unwrap();
    assert_eq!(cash, LedgerBalance::opening(DrCr::Dr, dec!(5000)));
    let owner = ledger.get_ledger_balance(capital, None).await.unwrap();
    assert_eq!(owner, LedgerBalance::opening(DrCr::Cr, dec!(5000)));

    let rows = ledger
        .journal_for_document(DocumentRef::Voucher(voucher_id))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.voucher_id == Some(voucher_id.into_inner())));
    assert!(rows.iter().all(|row| row.bill_id.is_none() && row.collection_id.is_none()));
}

#[tokio::test]
async fn test_opposite_posting_flips_side_and_zero_keeps_it() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let maintenance = head_id(&db, MAINTENANCE_EXPENSE).await;
    let vouchers = VoucherRepository::new(db.clone());
    let ledger = LedgerRepository::new(db.clone());

    post(&vouchers, VoucherType::Receipt, date(2026, 1, 1), journal(heads.cash, capital, dec!(100))).await;
    post(&vouchers, VoucherType::Payment, date(2026, 1, 2), journal(maintenance, heads.cash, dec!(150))).await;

    let cash = ledger.get_ledger_balance(heads.cash, None).await.unwrap();
    assert_eq!(cash, LedgerBalance::opening(DrCr::Cr, dec!(50)));

    post(&vouchers, VoucherType::Receipt, date(2026, 1, 3), journal(heads.cash, capital, dec!(50))).await;
    let cash = ledger.get_ledger_balance(heads.cash, None).await.unwrap();
    assert!(cash.is_zero());
    assert_eq!(cash.dr_cr, DrCr::Cr);
}

#[tokio::test]
async fn test_balance_as_of_reads_latest_snapshot() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let vouchers = VoucherRepository::new(db.clone());
    let ledger = LedgerRepository::new(db.clone());

    post(&vouchers, VoucherType::Receipt, date(2026, 1, 5), journal(heads.cash, capital, dec!(100))).await;
    post(&vouchers, VoucherType::Receipt, date(2026, 1, 10), journal(heads.cash, capital, dec!(200))).await;

    let before = ledger
        .get_ledger_balance(heads.cash, Some(date(2026, 1, 1)))
        .await
        .unwrap();
    assert!(before.is_zero());

    let mid = ledger
        .get_ledger_balance(heads.cash, Some(date(2026, 1, 7)))
        .await
        .unwrap();
    assert_eq!(mid.amount, dec!(100));

    let end = ledger
        .get_ledger_balance(heads.cash, Some(date(2026, 1, 31)))
        .await
        .unwrap();
    assert_eq!(end.amount, dec!(300));
    assert_eq!(ledger.get_ledger_balance(heads.cash, None).await.unwrap(), end);
}

#[tokio::test]
async fn test_backdated_posting_moves_later_snapshots() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let vouchers = VoucherRepository::new(db.clone());
    let ledger = LedgerRepository::new(db.clone());

    post(&vouchers, VoucherType::Receipt, date(2026, 3, 10), journal(heads.cash, capital, dec!(100))).await;
    post(&vouchers, VoucherType::Journal, date(2026, 3, 5), journal(heads.bank, heads.cash, dec!(40))).await;

    let cash_early = ledger
        .get_ledger_balance(heads.cash, Some(date(2026, 3, 5)))
        .await
        .unwrap();
    assert_eq!(cash_early, LedgerBalance::opening(DrCr::Cr, dec!(40)));

    let cash_late = ledger
        .get_ledger_balance(heads.cash, Some(date(2026, 3, 10)))
        .await
        .unwrap();
    assert_eq!(cash_late, LedgerBalance::opening(DrCr::Dr, dec!(60)));
    assert_eq!(ledger.get_ledger_balance(heads.cash, None).await.unwrap(), cash_late);

    let mid = ledger.get_trial_balance(Some(date(2026, 3, 7))).await.unwrap();
    assert!(mid.is_balanced);
    assert_eq!(mid.total_debit, dec!(40));
    assert_eq!(mid.total_credit, dec!(40));

    let end = ledger.get_trial_balance(Some(date(2026, 3, 10))).await.unwrap();
    assert!(end.is_balanced);
    assert_eq!(end.total_debit, dec!(100));
    assert_eq!(end.total_credit, dec!(100));

    assert!(ledger.verify().await.unwrap().is_consistent());
}

#[tokio::test]
async fn test_same_head_on_both_sides_of_a_document() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let vouchers = VoucherRepository::new(db.clone());
    let ledger = LedgerRepository::new(db.clone());

    post(
        &vouchers,
        VoucherType::Journal,
        date(2026, 3, 1),
        vec![
            PostingLine::debit(heads.cash, dec!(100)),
            PostingLine::credit(heads.cash, dec!(30)),
            PostingLine::credit(capital, dec!(70)),
        ],
    )
    .await;

    let cash = ledger.get_ledger_balance(heads.cash, None).await.unwrap();
    assert_eq!(cash, LedgerBalance::opening(DrCr::Dr, dec!(70)));
    let snapshot = ledger
        .get_ledger_balance(heads.cash, Some(date(2026, 3, 1)))
        .await
        .unwrap();
    assert_eq!(snapshot, cash);
}

#[tokio::test]
async fn test_unbalanced_voucher_writes_nothing() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let vouchers = VoucherRepository::new(db.clone());

    let err = vouchers
        .create_voucher(CreateVoucherInput {
            voucher_type: VoucherType::Journal,
            voucher_date: date(2026, 1, 5),
            narration: "broken".to_string(),
            reference: None,
            lines: vec![
                PostingLine::debit(heads.cash, dec!(100)),
                PostingLine::credit(capital, dec!(90)),
            ],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, VoucherError::Ledger(LedgerError::Unbalanced { .. })));

    assert_eq!(vouchers::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(account_journal::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_inactive_head_is_rejected() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let head_repo = HeadRepository::new(db.clone());
    let sundry = head_repo
        .create(CreateHeadInput {
            code: "5900".to_string(),
            name: "Sundry expense".to_string(),
            head_type: HeadType::Expense,
            description: None,
        })
        .await
        .unwrap();
    let sundry_id = HeadId::from_uuid(sundry.id);
    head_repo.deactivate(sundry_id).await.unwrap();

    let err = VoucherRepository::new(db.clone())
        .create_voucher(CreateVoucherInput {
            voucher_type: VoucherType::Payment,
            voucher_date: date(2026, 2, 1),
            narration: "paid sundry".to_string(),
            reference: None,
            lines: journal(sundry_id, heads.cash, dec!(40)),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        VoucherError::Posting(PostingError::Ledger(LedgerError::HeadInactive(id))) if id == sundry_id
    ));
    assert_eq!(vouchers::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_system_heads_cannot_be_deactivated() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let head_repo = HeadRepository::new(db.clone());

    assert!(head_repo.deactivate(heads.cash).await.is_err());
    assert_eq!(head_repo.ensure_system_heads().await.unwrap(), 0);
}

#[tokio::test]
async fn test_trial_balance_and_verify_after_postings() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let maintenance = head_id(&db, MAINTENANCE_EXPENSE).await;
    let vouchers = VoucherRepository::new(db.clone());
    let ledger = LedgerRepository::new(db.clone());

    post(&vouchers, VoucherType::Receipt, date(2026, 3, 1), journal(heads.bank, capital, dec!(1000))).await;
    post(&vouchers, VoucherType::Payment, date(2026, 3, 2), journal(maintenance, heads.bank, dec!(250))).await;

    let tb = ledger.get_trial_balance(None).await.unwrap();
    assert!(tb.is_balanced);
    assert_eq!(tb.total_debit, dec!(1000));
    assert_eq!(tb.total_credit, dec!(1000));
    assert_eq!(tb.rows.len(), 3);

    let early = ledger.get_trial_balance(Some(date(2026, 3, 1))).await.unwrap();
    assert!(early.is_balanced);
    assert_eq!(early.total_debit, dec!(1000));

    let report = ledger.verify().await.unwrap();
    assert!(report.is_consistent());
    assert_eq!(report.journal_debit, dec!(1250));
    assert_eq!(report.journal_credit, dec!(1250));
}

#[tokio::test]
async fn test_payment_voucher_must_credit_cash_or_bank() {
    let db = setup_db().await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let maintenance = head_id(&db, MAINTENANCE_EXPENSE).await;

    let err = VoucherRepository::new(db.clone())
        .create_voucher(CreateVoucherInput {
            voucher_type: VoucherType::Payment,
            voucher_date: date(2026, 3, 2),
            narration: "not a payment".to_string(),
            reference: None,
            lines: journal(maintenance, capital, dec!(10)),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, VoucherError::MissingCashLine(VoucherType::Payment, _)));
}

#[tokio::test]
async fn test_voucher_reference_is_unique_and_lines_are_kept() {
    let db = setup_db().await;
    let heads = posting_heads(&db).await;
    let capital = head_id(&db, OWNER_CAPITAL).await;
    let vouchers = VoucherRepository::new(db.clone());

    let input = CreateVoucherInput {
        voucher_type: VoucherType::Receipt,
        voucher_date: date(2026, 4, 1),
        narration: "capital injection".to_string(),
        reference: Some("RV-001".to_string()),
        lines: journal(heads.cash, capital, dec!(700)),
    };
    let created = vouchers.create_voucher(input.clone()).await.unwrap();
    assert_eq!(created.voucher.total_amount, dec!(700));

    let fetched = vouchers
        .get_voucher(VoucherId::from_uuid(created.voucher.id))
        .await
        .unwrap();
    assert_eq!(fetched.lines.len(), 2);
    assert_eq!(fetched.lines[0].line_no, 1);
    assert_eq!(fetched.lines[1].line_no, 2);

    let err = vouchers.create_voucher(input).await.unwrap_err();
    assert!(matches!(err, VoucherError::DuplicateReference(_)));

    let listed = vouchers
        .list_vouchers(date(2026, 4, 1), date(2026, 4, 30))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}
