//! `SeaORM` Entity for journal_header table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{VoucherStatus, VoucherType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_header")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub voucher_no: String,
    pub voucher_date: Date,
    pub voucher_type: VoucherType,
    pub status: VoucherStatus,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub total_debit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub total_credit: Decimal,
    pub description: Option<String>,
    pub created_by: String,
    pub approved_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub approved_at: Option<DateTimeUtc>,
    pub needs_manual_invoice: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_details::Entity")]
    JournalDetails,
    #[sea_orm(has_one = "super::tax_invoice::Entity")]
    TaxInvoice,
}

impl Related<super::journal_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalDetails.def()
    }
}

impl Related<super::tax_invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxInvoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
