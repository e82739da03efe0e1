//! `SeaORM` Entity for renters table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "renters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub trade_license: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::shop_allocations::Entity")]
    ShopAllocations,
    #[sea_orm(has_many = "super::bill_collections::Entity")]
    BillCollections,
    #[sea_orm(has_many = "super::tenant_trans_history::Entity")]
    TenantTransHistory,
}

impl Related<super::shop_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShopAllocations.def()
    }
}

impl Related<super::bill_collections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillCollections.def()
    }
}

impl Related<super::tenant_trans_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TenantTransHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
