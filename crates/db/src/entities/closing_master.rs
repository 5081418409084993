//! `SeaORM` Entity for closing_master table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PeriodStatus, PeriodType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "closing_master")]
pub struct Model {
    /// `{year}-{MM}-{period_type}`, unique per period.
    #[sea_orm(primary_key, auto_increment = false)]
    pub period_id: String,
    pub year: i32,
    /// Always 12 for annual periods.
    pub month: i32,
    pub period_type: PeriodType,
    pub status: PeriodStatus,
    pub closed_date: Option<Date>,
    pub closed_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
