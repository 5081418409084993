//! `SeaORM` Entity for tax_invoice table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{InvoiceStatus, InvoiceType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tax_invoice")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub invoice_no: String,
    pub invoice_type: InvoiceType,
    #[sea_orm(unique)]
    pub voucher_no: String,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub supply_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    pub issue_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_header::Entity",
        from = "Column::VoucherNo",
        to = "super::journal_header::Column::VoucherNo"
    )]
    JournalHeader,
}

impl Related<super::journal_header::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalHeader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
