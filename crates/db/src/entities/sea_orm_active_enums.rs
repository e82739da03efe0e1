//! String-backed enums stored in entity columns, with conversions to the
//! domain types in `rentbook-core`.

use rentbook_core::billing::{BillStatus, ParticularKind};
use rentbook_core::ledger::{DepositAccount, DrCr, HeadType};
use rentbook_core::reports::StatementEntryKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Debit/credit tag column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    #[sea_orm(string_value = "dr")]
    Dr,
    #[sea_orm(string_value = "cr")]
    Cr,
}

/// Head of account type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum HeadCategory {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Bill particular kind column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ParticularType {
    #[sea_orm(string_value = "rent")]
    Rent,
    #[sea_orm(string_value = "electricity")]
    Electricity,
    #[sea_orm(string_value = "gas")]
    Gas,
    #[sea_orm(string_value = "wasa")]
    Wasa,
    #[sea_orm(string_value = "internet")]
    Internet,
}

/// Bill status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum BillState {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "void")]
    Void,
}

/// Where a collection was deposited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "lowercase")]
pub enum DepositTo {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank")]
    Bank,
}

/// Voucher type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum VoucherType {
    /// Money paid out.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Money received outside the bill flow.
    #[sea_orm(string_value = "receipt")]
    Receipt,
    /// Non-cash adjustment.
    #[sea_orm(string_value = "journal")]
    Journal,
}

/// Tenant history movement kind column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TenantEntryKind {
    #[sea_orm(string_value = "bill")]
    Bill,
    #[sea_orm(string_value = "collection")]
    Collection,
    #[sea_orm(string_value = "void")]
    Void,
}

macro_rules! mirror_enum {
    ($db:ident <=> $domain:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$db> for $domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$domain> for $db {
            fn from(value: $domain) -> Self {
                match value {
                    $($domain::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(EntrySide <=> DrCr { Dr, Cr });
mirror_enum!(HeadCategory <=> HeadType { Asset, Liability, Equity, Revenue, Expense });
mirror_enum!(ParticularType <=> ParticularKind { Rent, Electricity, Gas, Wasa, Internet });
mirror_enum!(BillState <=> BillStatus { Unpaid, PartiallyPaid, Paid, Void });
mirror_enum!(DepositTo <=> DepositAccount { Cash, Bank });
mirror_enum!(TenantEntryKind <=> StatementEntryKind { Bill, Collection, Void });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_are_symmetric() {
        for kind in ParticularKind::ALL {
            assert_eq!(ParticularKind::from(ParticularType::from(kind)), kind);
        }
        assert_eq!(DrCr::from(EntrySide::Cr), DrCr::Cr);
        assert_eq!(BillState::from(BillStatus::PartiallyPaid), BillState::PartiallyPaid);
    }

    #[test]
    fn test_string_values_match_domain() {
        assert_eq!(EntrySide::Dr.to_value(), DrCr::Dr.as_str());
        assert_eq!(BillState::PartiallyPaid.to_value(), BillStatus::PartiallyPaid.as_str());
        assert_eq!(ParticularType::Wasa.to_value(), ParticularKind::Wasa.as_str());
    }
}
