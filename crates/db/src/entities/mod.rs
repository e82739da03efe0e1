//! `SeaORM` entity definitions.

pub mod account_journal;
pub mod bill_collections;
pub mod bill_particular_drafts;
pub mod bill_particulars;
pub mod bills;
pub mod collection_allocations;
pub mod heads_of_accounts;
pub mod ledger_current;
pub mod ledger_history;
pub mod renters;
pub mod sea_orm_active_enums;
pub mod shop_allocations;
pub mod shops;
pub mod tenant_trans_history;
pub mod voucher_lines;
pub mod vouchers;
