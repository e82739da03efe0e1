//! `SeaORM` Entity for account_journal table.
//!
//! Exactly one of `bill_id`, `collection_id` and `voucher_id` is set on
//! every row; `DocumentRef` is the typed view of the three.

use rentbook_core::ledger::{DocumentRef, LedgerError, PostingLine};
use rentbook_shared::types::HeadId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntrySide;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account_journal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub head_id: Uuid,
    pub entry_date: Date,
    pub posted_on: Date,
    pub dr_cr: EntrySide,
    pub amount: Decimal,
    pub narration: Option<String>,
    pub bill_id: Option<Uuid>,
    pub collection_id: Option<Uuid>,
    pub voucher_id: Option<Uuid>,
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
    /// The document this row was posted for.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocumentRef` if the row does not reference exactly
    /// one document.
    pub fn document(&self) -> Result<DocumentRef, LedgerError> {
        DocumentRef::from_columns(self.bill_id, self.collection_id, self.voucher_id)
    }

    /// The posting line this row records.
    #[must_use]
    pub fn posting_line(&self) -> PostingLine {
        PostingLine {
            head_id: HeadId::from_uuid(self.head_id),
            dr_cr: self.dr_cr.into(),
            amount: self.amount,
            narration: self.narration.clone(),
        }
    }
}

/// Filters journal rows down to those of one document.
#[must_use]
pub fn document_filter(document: &DocumentRef) -> sea_orm::Condition {
    let id = document.id();
    let condition = sea_orm::Condition::all();
    match document {
        DocumentRef::Bill(_) => condition.add(Column::BillId.eq(id)),
        DocumentRef::Collection(_) => condition.add(Column::CollectionId.eq(id)),
        DocumentRef::Voucher(_) => condition.add(Column::VoucherId.eq(id)),
    }
}
