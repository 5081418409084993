//! `SeaORM` Entity for voucher_sequence table.
//!
//! One row per voucher date holding the last sequence number handed out.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "voucher_sequence")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub voucher_date: Date,
    pub last_seq: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
