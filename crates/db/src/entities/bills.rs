//! `SeaORM` Entity for bills table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::BillState;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub shop_id: Uuid,
    pub renter_id: Uuid,
    pub allocation_id: Uuid,
    pub period: String,
    pub bill_date: Date,
    pub due_date: Date,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub status: BillState,
    pub void_reason: Option<String>,
    pub voided_on: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shops::Entity",
        from = "Column::ShopId",
        to = "super::shops::Column::Id"
    )]
    Shops,
    #[sea_orm(
        belongs_to = "super::renters::Entity",
        from = "Column::RenterId",
        to = "super::renters::Column::Id"
    )]
    Renters,
    #[sea_orm(has_many = "super::bill_particulars::Entity")]
    BillParticulars,
    #[sea_orm(has_many = "super::collection_allocations::Entity")]
    CollectionAllocations,
}

impl Related<super::shops::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shops.def()
    }
}

impl Related<super::renters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Renters.def()
    }
}

impl Related<super::bill_particulars::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillParticulars.def()
    }
}

impl Related<super::collection_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Amount still owed on the bill.
    #[must_use]
    pub fn due_amount(&self) -> Decimal {
        self.total_amount - self.paid_amount
    }
}
