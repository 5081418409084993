//! Fixed asset repository: register, depreciation postings and disposal.

use chrono::NaiveDate;
use hoegye_core::LedgerError;
use hoegye_core::depreciation::{
    DepreciationSchedule, FixedAsset, NewFixedAsset, ScheduleRow, apply_depreciation,
    build_schedule, compute_monthly_depreciation, depreciation_due,
};
use hoegye_core::ledger::{Voucher, VoucherTemplate, validate_voucher};
use hoegye_shared::LedgerConfig;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::{debug, info};

use super::account::load_catalog;
use super::error::{db_err, is_unique_violation, to_i32, to_u32};
use super::voucher::{DepreciationLink, VoucherRepository};
use crate::entities::{
    depreciation_entry, fixed_asset, sea_orm_active_enums::DepreciationEntryStatus,
};

/// Fixed asset repository.
#[derive(Debug, Clone)]
pub struct FixedAssetRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl FixedAssetRepository {
    /// Creates a new fixed asset repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Registers an asset with no depreciation applied.
    ///
    /// # Errors
    ///
    /// - `MissingField` / `InvalidInput` for invalid figures
    /// - `DuplicateAsset` if the code exists
    pub async fn register(&self, input: NewFixedAsset) -> Result<FixedAsset, LedgerError> {
        let asset = input.into_asset()?;

        let model = fixed_asset::ActiveModel {
            asset_code: Set(asset.asset_code.clone()),
            name: Set(asset.name.clone()),
            acquisition_date: Set(asset.acquisition_date),
            acquisition_cost: Set(asset.acquisition_cost),
            depreciation_method: Set(asset.depreciation_method.into()),
            useful_life_years: Set(to_i32(asset.useful_life_years, "useful_life_years")?),
            salvage_value: Set(asset.salvage_value),
            accumulated_depreciation: Set(asset.accumulated_depreciation),
            book_value: Set(asset.book_value),
            disposal_date: Set(None),
        };
        fixed_asset::Entity::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    LedgerError::DuplicateAsset(asset.asset_code.clone())
                } else {
                    db_err(e)
                }
            })?;

        info!(asset_code = %asset.asset_code, cost = %asset.acquisition_cost, "fixed asset registered");
        Ok(asset)
    }

    /// Loads an asset.
    ///
    /// # Errors
    ///
    /// `AssetNotFound` for an unknown code.
    pub async fn get(&self, asset_code: &str) -> Result<FixedAsset, LedgerError> {
        require_asset(&self.db, asset_code).await
    }

    /// Lists the register in code order with current book values.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<FixedAsset>, LedgerError> {
        list_assets(&self.db).await
    }

    /// Depreciation state of an asset as of a date.
    ///
    /// # Errors
    ///
    /// `AssetNotFound`, or `NotImplemented` for unsupported methods.
    pub async fn depreciation_as_of(
        &self,
        asset_code: &str,
        as_of_date: NaiveDate,
    ) -> Result<DepreciationSchedule, LedgerError> {
        let asset = self.get(asset_code).await?;
        compute_monthly_depreciation(&asset, as_of_date)
    }

    /// Month-by-month plan over the useful life.
    ///
    /// # Errors
    ///
    /// `AssetNotFound`, or `NotImplemented` for unsupported methods.
    pub async fn schedule(&self, asset_code: &str) -> Result<Vec<ScheduleRow>, LedgerError> {
        let asset = self.get(asset_code).await?;
        build_schedule(&asset)
    }

    /// Creates a transfer voucher for the depreciation still due as of a
    /// date, linked to the asset. Returns `None` when nothing is due.
    ///
    /// The asset itself changes only when the voucher is approved.
    ///
    /// # Errors
    ///
    /// - `AssetNotFound`, or `NotImplemented` for unsupported methods
    /// - voucher creation errors, e.g. `PeriodClosed`
    pub async fn post_depreciation(
        &self,
        asset_code: &str,
        as_of_date: NaiveDate,
        created_by: &str,
    ) -> Result<Option<Voucher>, LedgerError> {
        let asset = self.get(asset_code).await?;
        let pending = pending_amount(&self.db, asset_code).await?;
        let due = depreciation_due(&asset, as_of_date, pending)?;
        if due.is_zero() {
            debug!(asset_code, %as_of_date, "no depreciation due");
            return Ok(None);
        }

        let input = VoucherTemplate::transfer(
            self.config.depreciation_expense_account.clone(),
            self.config.accumulated_depreciation_account.clone(),
            due,
        )
        .into_input(
            as_of_date,
            created_by,
            Some(format!("Depreciation of {asset_code} through {as_of_date}")),
            None,
            &self.config,
        )?;
        let catalog = load_catalog(&self.db).await?;
        let validated = validate_voucher(&input, &catalog)?;

        let link = DepreciationLink {
            asset_code: asset_code.to_string(),
            as_of_date,
            amount: due,
        };
        let voucher = VoucherRepository::new(self.db.clone(), self.config.clone())
            .create_validated(&validated, Some(&link))
            .await?;

        info!(asset_code, %as_of_date, amount = %due, voucher_no = %voucher.voucher_no, "depreciation posted");
        Ok(Some(voucher))
    }

    /// Records the disposal date, freezing further depreciation.
    ///
    /// Repeating with the same date is a no-op.
    ///
    /// # Errors
    ///
    /// - `AssetNotFound` for an unknown code
    /// - `InvalidInput` for a date before acquisition
    /// - `AssetAlreadyDisposed` if disposed on a different date
    pub async fn dispose(
        &self,
        asset_code: &str,
        disposal_date: NaiveDate,
    ) -> Result<FixedAsset, LedgerError> {
        let asset = self.get(asset_code).await?;
        if disposal_date < asset.acquisition_date {
            return Err(LedgerError::InvalidInput(format!(
                "disposal date {disposal_date} precedes acquisition on {}",
                asset.acquisition_date
            )));
        }

        let result = fixed_asset::Entity::update_many()
            .set(fixed_asset::ActiveModel {
                disposal_date: Set(Some(disposal_date)),
                ..Default::default()
            })
            .filter(fixed_asset::Column::AssetCode.eq(asset_code))
            .filter(fixed_asset::Column::DisposalDate.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        let asset = self.get(asset_code).await?;
        match asset.disposal_date {
            Some(existing) if existing == disposal_date => {
                if result.rows_affected > 0 {
                    info!(asset_code, %disposal_date, "fixed asset disposed");
                }
                Ok(asset)
            }
            Some(existing) => Err(LedgerError::AssetAlreadyDisposed {
                asset_code: asset_code.to_string(),
                disposal_date: existing,
            }),
            None => Err(LedgerError::Internal(format!(
                "disposal of {asset_code} was not recorded"
            ))),
        }
    }
}

/// Applies the pending depreciation entry of an approved voucher to its
/// asset. Vouchers without an entry are left alone.
pub(crate) async fn apply_for_voucher<C: ConnectionTrait>(
    db: &C,
    voucher_no: &str,
) -> Result<(), LedgerError> {
    let Some(entry) = depreciation_entry::Entity::find()
        .filter(depreciation_entry::Column::VoucherNo.eq(voucher_no))
        .filter(depreciation_entry::Column::Status.eq(DepreciationEntryStatus::Pending))
        .one(db)
        .await
        .map_err(db_err)?
    else {
        return Ok(());
    };

    // Concurrent approvals for one asset apply one after the other, each on
    // the accumulated amount the previous one committed.
    let asset = fixed_asset::Entity::find_by_id(entry.asset_code.as_str())
        .lock_exclusive()
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| LedgerError::AssetNotFound(entry.asset_code.clone()))
        .and_then(model_to_asset)?;
    let (accumulated, book_value) = apply_depreciation(&asset, entry.amount);

    fixed_asset::Entity::update_many()
        .set(fixed_asset::ActiveModel {
            accumulated_depreciation: Set(accumulated),
            book_value: Set(book_value),
            ..Default::default()
        })
        .filter(fixed_asset::Column::AssetCode.eq(asset.asset_code.as_str()))
        .exec(db)
        .await
        .map_err(db_err)?;

    let asset_code = entry.asset_code.clone();
    let mut active: depreciation_entry::ActiveModel = entry.into();
    active.status = Set(DepreciationEntryStatus::Applied);
    active.update(db).await.map_err(db_err)?;

    info!(%asset_code, voucher_no, %accumulated, %book_value, "depreciation applied");
    Ok(())
}

/// Marks the depreciation entry of a cancelled voucher cancelled.
pub(crate) async fn cancel_for_voucher<C: ConnectionTrait>(
    db: &C,
    voucher_no: &str,
) -> Result<(), LedgerError> {
    depreciation_entry::Entity::update_many()
        .set(depreciation_entry::ActiveModel {
            status: Set(DepreciationEntryStatus::Cancelled),
            ..Default::default()
        })
        .filter(depreciation_entry::Column::VoucherNo.eq(voucher_no))
        .filter(depreciation_entry::Column::Status.eq(DepreciationEntryStatus::Pending))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

/// Assets in code order.
pub(crate) async fn list_assets<C: ConnectionTrait>(db: &C) -> Result<Vec<FixedAsset>, LedgerError> {
    fixed_asset::Entity::find()
        .order_by_asc(fixed_asset::Column::AssetCode)
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(model_to_asset)
        .collect()
}

async fn require_asset<C: ConnectionTrait>(db: &C, asset_code: &str) -> Result<FixedAsset, LedgerError> {
    fixed_asset::Entity::find_by_id(asset_code)
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| LedgerError::AssetNotFound(asset_code.to_string()))
        .and_then(model_to_asset)
}

/// Depreciation waiting in unapproved vouchers.
async fn pending_amount<C: ConnectionTrait>(db: &C, asset_code: &str) -> Result<Decimal, LedgerError> {
    let amounts: Vec<Decimal> = depreciation_entry::Entity::find()
        .filter(depreciation_entry::Column::AssetCode.eq(asset_code))
        .filter(depreciation_entry::Column::Status.eq(DepreciationEntryStatus::Pending))
        .select_only()
        .column(depreciation_entry::Column::Amount)
        .into_tuple()
        .all(db)
        .await
        .map_err(db_err)?;
    Ok(amounts.into_iter().sum())
}

fn model_to_asset(model: fixed_asset::Model) -> Result<FixedAsset, LedgerError> {
    Ok(FixedAsset {
        useful_life_years: to_u32(model.useful_life_years, "useful_life_years")?,
        asset_code: model.asset_code,
        name: model.name,
        acquisition_date: model.acquisition_date,
        acquisition_cost: model.acquisition_cost,
        depreciation_method: model.depreciation_method.into(),
        salvage_value: model.salvage_value,
        accumulated_depreciation: model.accumulated_depreciation,
        book_value: model.book_value,
        disposal_date: model.disposal_date,
    })
}
