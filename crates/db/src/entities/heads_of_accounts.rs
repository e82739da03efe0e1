//! `SeaORM` Entity for heads_of_accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::HeadCategory;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "heads_of_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub head_type: HeadCategory,
    pub description: Option<String>,
    pub is_system: bool,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::ledger_current::Entity")]
    LedgerCurrent,
    #[sea_orm(has_many = "super::ledger_history::Entity")]
    LedgerHistory,
    #[sea_orm(has_many = "super::account_journal::Entity")]
    AccountJournal,
}

impl Related<super::ledger_current::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerCurrent.def()
    }
}

impl Related<super::ledger_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerHistory.def()
    }
}

impl Related<super::account_journal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountJournal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
