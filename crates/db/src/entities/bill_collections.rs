//! `SeaORM` Entity for bill_collections table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DepositTo;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bill_collections")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub renter_id: Uuid,
    #[sea_orm(unique)]
    pub reference: Option<String>,
    pub collected_on: Date,
    pub deposit_to: DepositTo,
    pub gross_amount: Decimal,
    pub tds_amount: Decimal,
    pub vat_amount: Decimal,
    pub net_amount: Decimal,
    pub applied_amount: Decimal,
    pub unapplied_amount: Decimal,
    pub remarks: Option<String>,
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
    #[sea_orm(has_many = "super::collection_allocations::Entity")]
    CollectionAllocations,
}

impl Related<super::renters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Renters.def()
    }
}

impl Related<super::collection_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
