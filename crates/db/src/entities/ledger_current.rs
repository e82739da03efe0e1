//! `SeaORM` Entity for ledger_current table.
//!
//! One row per head holding its live running balance.

use rentbook_core::ledger::LedgerBalance;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntrySide;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_current")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub head_id: Uuid,
    pub amount: Decimal,
    pub dr_cr: EntrySide,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::heads_of_accounts::Entity",
        from = "Column::HeadId",
        to = "super::heads_of_accounts::Column::Id"
    )]
    HeadsOfAccounts,
}

impl Related<super::heads_of_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HeadsOfAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The stored balance.
    #[must_use]
    pub fn balance(&self) -> LedgerBalance {
        LedgerBalance {
            amount: self.amount,
            dr_cr: self.dr_cr.into(),
        }
    }
}
