//! `SeaORM` Entity for tenant_trans_history table.

use rentbook_core::reports::StatementLine;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TenantEntryKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenant_trans_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub renter_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub trans_date: Date,
    pub kind: TenantEntryKind,
    pub bill_id: Option<Uuid>,
    pub collection_id: Option<Uuid>,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::renters::Entity",
        from = "Column::RenterId",
        to = "super::renters::Column::Id"
    )]
    Renters,
}

impl Related<super::renters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Renters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The row as a statement line.
    #[must_use]
    pub fn statement_line(&self) -> StatementLine {
        StatementLine {
            date: self.trans_date,
            kind: self.kind.into(),
            document_id: self.collection_id.or(self.bill_id).unwrap_or(self.id),
            description: self.description.clone(),
            debit: self.debit,
            credit: self.credit,
            balance: self.balance,
        }
    }
}
