//! `SeaORM` active enums, stored as short text columns.
//!
//! Each enum mirrors a core domain enum; `From` conversions go both ways.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use hoegye_core::{account, closing, depreciation, invoice, ledger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountType {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum VoucherType {
    #[sea_orm(string_value = "receipt")]
    Receipt,
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "sales")]
    Sales,
    #[sea_orm(string_value = "purchase")]
    Purchase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum VoucherStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum InvoiceType {
    #[sea_orm(string_value = "sales")]
    Sales,
    #[sea_orm(string_value = "purchase")]
    Purchase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "issued")]
    Issued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DepreciationMethod {
    #[sea_orm(string_value = "straight")]
    Straight,
    #[sea_orm(string_value = "declining")]
    Declining,
    #[sea_orm(string_value = "production")]
    Production,
}

/// Lifecycle of a depreciation voucher link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DepreciationEntryStatus {
    /// Voucher created, not yet approved.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Voucher approved and the asset updated.
    #[sea_orm(string_value = "applied")]
    Applied,
    /// Voucher cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PeriodType {
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "annual")]
    Annual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PeriodStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
}

macro_rules! mirror_core_enum {
    ($db:ident <=> $module:ident :: $core:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$module::$core> for $db {
            fn from(value: $module::$core) -> Self {
                match value {
                    $($module::$core::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $module::$core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_core_enum!(AccountType <=> account::AccountType {
    Asset, Liability, Equity, Revenue, Expense
});
mirror_core_enum!(VoucherType <=> ledger::VoucherType {
    Receipt, Payment, Transfer, Sales, Purchase
});
mirror_core_enum!(VoucherStatus <=> ledger::VoucherStatus {
    Draft, Pending, Approved, Cancelled
});
mirror_core_enum!(InvoiceType <=> invoice::InvoiceType { Sales, Purchase });
mirror_core_enum!(InvoiceStatus <=> invoice::InvoiceStatus { Issued });
mirror_core_enum!(DepreciationMethod <=> depreciation::DepreciationMethod {
    Straight, Declining, Production
});
mirror_core_enum!(PeriodType <=> closing::PeriodType { Monthly, Annual });
mirror_core_enum!(PeriodStatus <=> closing::PeriodStatus { Open, Closed });
