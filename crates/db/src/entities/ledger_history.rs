//! `SeaORM` Entity for ledger_history table.
//!
//! Daily snapshot of a head's balance, unique per head and date.

use rentbook_core::ledger::LedgerBalance;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntrySide;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub head_id: Uuid,
    pub snapshot_date: Date,
    pub amount: Decimal,
    pub dr_cr: EntrySide,
    pub created_at: DateTimeWithTimeZone,
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
    /// The snapshot balance.
    #[must_use]
    pub fn balance(&self) -> LedgerBalance {
        LedgerBalance {
            amount: self.amount,
            dr_cr: self.dr_cr.into(),
        }
    }
}
