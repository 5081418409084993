//! `SeaORM` Entity for depreciation_entry table.
//!
//! Links a depreciation voucher to the asset it depreciates.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DepreciationEntryStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "depreciation_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub asset_code: String,
    #[sea_orm(unique)]
    pub voucher_no: String,
    pub as_of_date: Date,
    #[sea_orm(column_type = "Decimal(Some((20, 2)))")]
    pub amount: Decimal,
    pub status: DepreciationEntryStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fixed_asset::Entity",
        from = "Column::AssetCode",
        to = "super::fixed_asset::Column::AssetCode"
    )]
    FixedAsset,
    #[sea_orm(
        belongs_to = "super::journal_header::Entity",
        from = "Column::VoucherNo",
        to = "super::journal_header::Column::VoucherNo"
    )]
    JournalHeader,
}

impl Related<super::fixed_asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FixedAsset.def()
    }
}

impl Related<super::journal_header::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalHeader.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
