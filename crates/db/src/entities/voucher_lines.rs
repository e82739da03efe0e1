//! `SeaORM` Entity for voucher_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntrySide;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voucher_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub voucher_id: Uuid,
    pub line_no: i32,
    pub head_id: Uuid,
    pub dr_cr: EntrySide,
    pub amount: Decimal,
    pub narration: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vouchers::Entity",
        from = "Column::VoucherId",
        to = "super::vouchers::Column::Id"
    )]
    Vouchers,
    #[sea_orm(
        belongs_to = "super::heads_of_accounts::Entity",
        from = "Column::HeadId",
        to = "super::heads_of_accounts::Column::Id"
    )]
    HeadsOfAccounts,
}

impl Related<super::vouchers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vouchers.def()
    }
}

impl Related<super::heads_of_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HeadsOfAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
