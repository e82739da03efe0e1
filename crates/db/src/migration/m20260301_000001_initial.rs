//! Initial database migration.
//!
//! Creates the chart of heads, property, billing, collection, voucher and
//! ledger tables together with their unique indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: CHART OF HEADS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(HeadsOfAccounts::Table)
                    .if_not_exists()
                    .col(uuid_pk(HeadsOfAccounts::Id))
                    .col(ColumnDef::new(HeadsOfAccounts::Code).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(HeadsOfAccounts::Name).string_len(120).not_null())
                    .col(ColumnDef::new(HeadsOfAccounts::HeadType).string_len(16).not_null())
                    .col(ColumnDef::new(HeadsOfAccounts::Description).text().null())
                    .col(ColumnDef::new(HeadsOfAccounts::IsSystem).boolean().not_null().default(false))
                    .col(ColumnDef::new(HeadsOfAccounts::IsActive).boolean().not_null().default(true))
                    .col(timestamp(HeadsOfAccounts::CreatedAt))
                    .col(timestamp(HeadsOfAccounts::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: PROPERTY
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Shops::Table)
                    .if_not_exists()
                    .col(uuid_pk(Shops::Id))
                    .col(ColumnDef::new(Shops::Code).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(Shops::Name).string_len(120).not_null())
                    .col(ColumnDef::new(Shops::Floor).string_len(20).null())
                    .col(ColumnDef::new(Shops::AreaSqft).decimal_len(12, 2).null())
                    .col(money(Shops::MonthlyRent))
                    .col(ColumnDef::new(Shops::IsActive).boolean().not_null().default(true))
                    .col(timestamp(Shops::CreatedAt))
                    .col(timestamp(Shops::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Renters::Table)
                    .if_not_exists()
                    .col(uuid_pk(Renters::Id))
                    .col(ColumnDef::new(Renters::Name).string_len(120).not_null())
                    .col(ColumnDef::new(Renters::Phone).string_len(32).null())
                    .col(ColumnDef::new(Renters::Email).string_len(255).null())
                    .col(ColumnDef::new(Renters::TradeLicense).string_len(64).null())
                    .col(ColumnDef::new(Renters::Address).text().null())
                    .col(ColumnDef::new(Renters::IsActive).boolean().not_null().default(true))
                    .col(timestamp(Renters::CreatedAt))
                    .col(timestamp(Renters::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ShopAllocations::Table)
                    .if_not_exists()
                    .col(uuid_pk(ShopAllocations::Id))
                    .col(ColumnDef::new(ShopAllocations::ShopId).uuid().not_null())
                    .col(ColumnDef::new(ShopAllocations::RenterId).uuid().not_null())
                    .col(ColumnDef::new(ShopAllocations::StartDate).date().not_null())
                    .col(ColumnDef::new(ShopAllocations::EndDate).date().null())
                    .col(timestamp(ShopAllocations::CreatedAt))
                    .col(timestamp(ShopAllocations::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shop_allocations_shop")
                            .from(ShopAllocations::Table, ShopAllocations::ShopId)
                            .to(Shops::Table, Shops::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shop_allocations_renter")
                            .from(ShopAllocations::Table, ShopAllocations::RenterId)
                            .to(Renters::Table, Renters::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shop_allocations_shop")
                    .table(ShopAllocations::Table)
                    .col(ShopAllocations::ShopId)
                    .col(ShopAllocations::StartDate)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: BILLING
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(BillParticularDrafts::Table)
                    .if_not_exists()
                    .col(uuid_pk(BillParticularDrafts::Id))
                    .col(ColumnDef::new(BillParticularDrafts::ShopId).uuid().not_null())
                    .col(ColumnDef::new(BillParticularDrafts::Period).string_len(7).not_null())
                    .col(ColumnDef::new(BillParticularDrafts::Kind).string_len(16).not_null())
                    .col(money(BillParticularDrafts::Amount))
                    .col(ColumnDef::new(BillParticularDrafts::Description).text().null())
                    .col(ColumnDef::new(BillParticularDrafts::MeterPrevious).decimal_len(14, 2).null())
                    .col(ColumnDef::new(BillParticularDrafts::MeterCurrent).decimal_len(14, 2).null())
                    .col(ColumnDef::new(BillParticularDrafts::UnitRate).decimal_len(12, 4).null())
                    .col(timestamp(BillParticularDrafts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bill_particular_drafts_shop")
                            .from(BillParticularDrafts::Table, BillParticularDrafts::ShopId)
                            .to(Shops::Table, Shops::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bill_particular_drafts_period")
                    .table(BillParticularDrafts::Table)
                    .col(BillParticularDrafts::Period)
                    .col(BillParticularDrafts::ShopId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Bills::Table)
                    .if_not_exists()
                    .col(uuid_pk(Bills::Id))
                    .col(ColumnDef::new(Bills::ShopId).uuid().not_null())
                    .col(ColumnDef::new(Bills::RenterId).uuid().not_null())
                    .col(ColumnDef::new(Bills::AllocationId).uuid().not_null())
                    .col(ColumnDef::new(Bills::Period).string_len(7).not_null())
                    .col(ColumnDef::new(Bills::BillDate).date().not_null())
                    .col(ColumnDef::new(Bills::DueDate).date().not_null())
                    .col(money(Bills::TotalAmount))
                    .col(money(Bills::PaidAmount))
                    .col(ColumnDef::new(Bills::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Bills::VoidReason).text().null())
                    .col(ColumnDef::new(Bills::VoidedOn).date().null())
                    .col(timestamp(Bills::CreatedAt))
                    .col(timestamp(Bills::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bills_shop")
                            .from(Bills::Table, Bills::ShopId)
                            .to(Shops::Table, Shops::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bills_renter")
                            .from(Bills::Table, Bills::RenterId)
                            .to(Renters::Table, Renters::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bills_allocation")
                            .from(Bills::Table, Bills::AllocationId)
                            .to(ShopAllocations::Table, ShopAllocations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One bill per shop per month; retried generation cannot double-bill.
        manager
            .create_index(
                Index::create()
                    .name("uq_bills_shop_period")
                    .table(Bills::Table)
                    .col(Bills::ShopId)
                    .col(Bills::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bills_renter_period")
                    .table(Bills::Table)
                    .col(Bills::RenterId)
                    .col(Bills::Period)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BillParticulars::Table)
                    .if_not_exists()
                    .col(uuid_pk(BillParticulars::Id))
                    .col(ColumnDef::new(BillParticulars::BillId).uuid().not_null())
                    .col(ColumnDef::new(BillParticulars::Kind).string_len(16).not_null())
                    .col(money(BillParticulars::Amount))
                    .col(ColumnDef::new(BillParticulars::Description).text().null())
                    .col(ColumnDef::new(BillParticulars::MeterPrevious).decimal_len(14, 2).null())
                    .col(ColumnDef::new(BillParticulars::MeterCurrent).decimal_len(14, 2).null())
                    .col(ColumnDef::new(BillParticulars::UnitRate).decimal_len(12, 4).null())
                    .col(timestamp(BillParticulars::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bill_particulars_bill")
                            .from(BillParticulars::Table, BillParticulars::BillId)
                            .to(Bills::Table, Bills::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: COLLECTIONS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(BillCollections::Table)
                    .if_not_exists()
                    .col(uuid_pk(BillCollections::Id))
                    .col(ColumnDef::new(BillCollections::RenterId).uuid().not_null())
                    .col(ColumnDef::new(BillCollections::Reference).string_len(64).null().unique_key())
                    .col(ColumnDef::new(BillCollections::CollectedOn).date().not_null())
                    .col(ColumnDef::new(BillCollections::DepositTo).string_len(8).not_null())
                    .col(money(BillCollections::GrossAmount))
                    .col(money(BillCollections::TdsAmount))
                    .col(money(BillCollections::VatAmount))
                    .col(money(BillCollections::NetAmount))
                    .col(money(BillCollections::AppliedAmount))
                    .col(money(BillCollections::UnappliedAmount))
                    .col(ColumnDef::new(BillCollections::Remarks).text().null())
                    .col(timestamp(BillCollections::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bill_collections_renter")
                            .from(BillCollections::Table, BillCollections::RenterId)
                            .to(Renters::Table, Renters::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CollectionAllocations::Table)
                    .if_not_exists()
                    .col(uuid_pk(CollectionAllocations::Id))
                    .col(ColumnDef::new(CollectionAllocations::CollectionId).uuid().not_null())
                    .col(ColumnDef::new(CollectionAllocations::BillId).uuid().not_null())
                    .col(money(CollectionAllocations::Amount))
                    .col(timestamp(CollectionAllocations::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collection_allocations_collection")
                            .from(CollectionAllocations::Table, CollectionAllocations::CollectionId)
                            .to(BillCollections::Table, BillCollections::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collection_allocations_bill")
                            .from(CollectionAllocations::Table, CollectionAllocations::BillId)
                            .to(Bills::Table, Bills::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 5: VOUCHERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Vouchers::Table)
                    .if_not_exists()
                    .col(uuid_pk(Vouchers::Id))
                    .col(ColumnDef::new(Vouchers::VoucherType).string_len(16).not_null())
                    .col(ColumnDef::new(Vouchers::VoucherDate).date().not_null())
                    .col(ColumnDef::new(Vouchers::Reference).string_len(64).null().unique_key())
                    .col(ColumnDef::new(Vouchers::Narration).text().not_null())
                    .col(money(Vouchers::TotalAmount))
                    .col(timestamp(Vouchers::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VoucherLines::Table)
                    .if_not_exists()
                    .col(uuid_pk(VoucherLines::Id))
                    .col(ColumnDef::new(VoucherLines::VoucherId).uuid().not_null())
                    .col(ColumnDef::new(VoucherLines::LineNo).integer().not_null())
                    .col(ColumnDef::new(VoucherLines::HeadId).uuid().not_null())
                    .col(ColumnDef::new(VoucherLines::DrCr).string_len(2).not_null())
                    .col(money(VoucherLines::Amount))
                    .col(ColumnDef::new(VoucherLines::Narration).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voucher_lines_voucher")
                            .from(VoucherLines::Table, VoucherLines::VoucherId)
                            .to(Vouchers::Table, Vouchers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voucher_lines_head")
                            .from(VoucherLines::Table, VoucherLines::HeadId)
                            .to(HeadsOfAccounts::Table, HeadsOfAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 6: LEDGER
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(AccountJournal::Table)
                    .if_not_exists()
                    .col(uuid_pk(AccountJournal::Id))
                    .col(ColumnDef::new(AccountJournal::HeadId).uuid().not_null())
                    .col(ColumnDef::new(AccountJournal::EntryDate).date().not_null())
                    .col(ColumnDef::new(AccountJournal::PostedOn).date().not_null())
                    .col(ColumnDef::new(AccountJournal::DrCr).string_len(2).not_null())
                    .col(money(AccountJournal::Amount))
                    .col(ColumnDef::new(AccountJournal::Narration).text().null())
                    .col(ColumnDef::new(AccountJournal::BillId).uuid().null())
                    .col(ColumnDef::new(AccountJournal::CollectionId).uuid().null())
                    .col(ColumnDef::new(AccountJournal::VoucherId).uuid().null())
                    .col(timestamp(AccountJournal::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_journal_head")
                            .from(AccountJournal::Table, AccountJournal::HeadId)
                            .to(HeadsOfAccounts::Table, HeadsOfAccounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_journal_bill")
                            .from(AccountJournal::Table, AccountJournal::BillId)
                            .to(Bills::Table, Bills::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_journal_collection")
                            .from(AccountJournal::Table, AccountJournal::CollectionId)
                            .to(BillCollections::Table, BillCollections::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_journal_voucher")
                            .from(AccountJournal::Table, AccountJournal::VoucherId)
                            .to(Vouchers::Table, Vouchers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_account_journal_head_date")
                    .table(AccountJournal::Table)
                    .col(AccountJournal::HeadId)
                    .col(AccountJournal::PostedOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LedgerCurrent::Table)
                    .if_not_exists()
                    .col(uuid_pk(LedgerCurrent::Id))
                    .col(ColumnDef::new(LedgerCurrent::HeadId).uuid().not_null().unique_key())
                    .col(money(LedgerCurrent::Amount))
                    .col(ColumnDef::new(LedgerCurrent::DrCr).string_len(2).not_null())
                    .col(timestamp(LedgerCurrent::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_current_head")
                            .from(LedgerCurrent::Table, LedgerCurrent::HeadId)
                            .to(HeadsOfAccounts::Table, HeadsOfAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LedgerHistory::Table)
                    .if_not_exists()
                    .col(uuid_pk(LedgerHistory::Id))
                    .col(ColumnDef::new(LedgerHistory::HeadId).uuid().not_null())
                    .col(ColumnDef::new(LedgerHistory::SnapshotDate).date().not_null())
                    .col(money(LedgerHistory::Amount))
                    .col(ColumnDef::new(LedgerHistory::DrCr).string_len(2).not_null())
                    .col(timestamp(LedgerHistory::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_history_head")
                            .from(LedgerHistory::Table, LedgerHistory::HeadId)
                            .to(HeadsOfAccounts::Table, HeadsOfAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_ledger_history_head_date")
                    .table(LedgerHistory::Table)
                    .col(LedgerHistory::HeadId)
                    .col(LedgerHistory::SnapshotDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 7: TENANT HISTORY
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(TenantTransHistory::Table)
                    .if_not_exists()
                    .col(uuid_pk(TenantTransHistory::Id))
                    .col(ColumnDef::new(TenantTransHistory::RenterId).uuid().not_null())
                    .col(ColumnDef::new(TenantTransHistory::ShopId).uuid().null())
                    .col(ColumnDef::new(TenantTransHistory::TransDate).date().not_null())
                    .col(ColumnDef::new(TenantTransHistory::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(TenantTransHistory::BillId).uuid().null())
                    .col(ColumnDef::new(TenantTransHistory::CollectionId).uuid().null())
                    .col(ColumnDef::new(TenantTransHistory::Description).text().not_null())
                    .col(money(TenantTransHistory::Debit))
                    .col(money(TenantTransHistory::Credit))
                    .col(money(TenantTransHistory::Balance))
                    .col(timestamp(TenantTransHistory::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_trans_history_renter")
                            .from(TenantTransHistory::Table, TenantTransHistory::RenterId)
                            .to(Renters::Table, Renters::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_trans_history_renter_date")
                    .table(TenantTransHistory::Table)
                    .col(TenantTransHistory::RenterId)
                    .col(TenantTransHistory::TransDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let tables = [
            TenantTransHistory::Table.into_iden(),
            LedgerHistory::Table.into_iden(),
            LedgerCurrent::Table.into_iden(),
            AccountJournal::Table.into_iden(),
            VoucherLines::Table.into_iden(),
            Vouchers::Table.into_iden(),
            CollectionAllocations::Table.into_iden(),
            BillCollections::Table.into_iden(),
            BillParticulars::Table.into_iden(),
            Bills::Table.into_iden(),
            BillParticularDrafts::Table.into_iden(),
            ShopAllocations::Table.into_iden(),
            Renters::Table.into_iden(),
            Shops::Table.into_iden(),
            HeadsOfAccounts::Table.into_iden(),
        ];

        for table in tables {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

fn uuid_pk<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).uuid().not_null().primary_key().to_owned()
}

fn money<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .decimal_len(16, 2)
        .not_null()
        .default(0)
        .to_owned()
}

fn timestamp<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[derive(DeriveIden)]
enum HeadsOfAccounts {
    Table,
    Id,
    Code,
    Name,
    HeadType,
    Description,
    IsSystem,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Shops {
    Table,
    Id,
    Code,
    Name,
    Floor,
    AreaSqft,
    MonthlyRent,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Renters {
    Table,
    Id,
    Name,
    Phone,
    Email,
    TradeLicense,
    Address,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ShopAllocations {
    Table,
    Id,
    ShopId,
    RenterId,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BillParticularDrafts {
    Table,
    Id,
    ShopId,
    Period,
    Kind,
    Amount,
    Description,
    MeterPrevious,
    MeterCurrent,
    UnitRate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Bills {
    Table,
    Id,
    ShopId,
    RenterId,
    AllocationId,
    Period,
    BillDate,
    DueDate,
    TotalAmount,
    PaidAmount,
    Status,
    VoidReason,
    VoidedOn,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BillParticulars {
    Table,
    Id,
    BillId,
    Kind,
    Amount,
    Description,
    MeterPrevious,
    MeterCurrent,
    UnitRate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BillCollections {
    Table,
    Id,
    RenterId,
    Reference,
    CollectedOn,
    DepositTo,
    GrossAmount,
    TdsAmount,
    VatAmount,
    NetAmount,
    AppliedAmount,
    UnappliedAmount,
    Remarks,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CollectionAllocations {
    Table,
    Id,
    CollectionId,
    BillId,
    Amount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Vouchers {
    Table,
    Id,
    VoucherType,
    VoucherDate,
    Reference,
    Narration,
    TotalAmount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum VoucherLines {
    Table,
    Id,
    VoucherId,
    LineNo,
    HeadId,
    DrCr,
    Amount,
    Narration,
}

#[derive(DeriveIden)]
enum AccountJournal {
    Table,
    Id,
    HeadId,
    EntryDate,
    PostedOn,
    DrCr,
    Amount,
    Narration,
    BillId,
    CollectionId,
    VoucherId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LedgerCurrent {
    Table,
    Id,
    HeadId,
    Amount,
    DrCr,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LedgerHistory {
    Table,
    Id,
    HeadId,
    SnapshotDate,
    Amount,
    DrCr,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TenantTransHistory {
    Table,
    Id,
    RenterId,
    ShopId,
    TransDate,
    Kind,
    BillId,
    CollectionId,
    Description,
    Debit,
    Credit,
    Balance,
    CreatedAt,
}
