//! `SeaORM` Entity for fixed_asset table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DepreciationMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fixed_asset")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub asset_code: String,
    pub name: String,
    pub acquisition_date: Date,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub acquisition_cost: Decimal,
    pub depreciation_method: DepreciationMethod,
    pub useful_life_years: i32,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub salvage_value: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub accumulated_depreciation: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub book_value: Decimal,
    pub disposal_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::depreciation_entry::Entity")]
    DepreciationEntry,
}

impl Related<super::depreciation_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepreciationEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
