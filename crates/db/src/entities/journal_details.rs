//! `SeaORM` Entity for journal_details table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub voucher_no: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub line_no: i32,
    pub account_code: String,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub debit_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub credit_amount: Decimal,
    pub cost_center: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_header::Entity",
        from = "Column::VoucherNo",
        to = "super::journal_header::Column::VoucherNo"
    )]
    JournalHeader,
    #[sea_orm(
        belongs_to = "super::account_master::Entity",
        from = "Column::AccountCode",
        to = "super::account_master::Column::Code"
    )]
    AccountMaster,
}

impl Related<super::journal_header::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalHeader.def()
    }
}

impl Related<super::account_master::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountMaster.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
