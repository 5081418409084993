//! `SeaORM` Entity for budget_master table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_master")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub budget_id: String,
    pub year: i32,
    /// `None` for annual budgets.
    pub month: Option<i32>,
    pub department: String,
    pub account_code: String,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub budget_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub actual_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub variance: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account_master::Entity",
        from = "Column::AccountCode",
        to = "super::account_master::Column::Code"
    )]
    AccountMaster,
}

impl Related<super::account_master::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountMaster.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
