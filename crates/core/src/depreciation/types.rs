//! Fixed asset types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Depreciation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepreciationMethod {
    /// Straight line.
    Straight,
    /// Declining balance (no formula defined).
    Declining,
    /// Units of production (no formula defined).
    Production,
}

impl DepreciationMethod {
    /// Lowercase name as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Declining => "declining",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepreciationMethod {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "straight" => Ok(Self::Straight),
            "declining" => Ok(Self::Declining),
            "production" => Ok(Self::Production),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown depreciation method '{other}'"
            ))),
        }
    }
}

/// A fixed asset in the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAsset {
    /// Unique asset code.
    pub asset_code: String,
    /// Display name.
    pub name: String,
    /// Acquisition date.
    pub acquisition_date: NaiveDate,
    /// Acquisition cost.
    pub acquisition_cost: Decimal,
    /// Depreciation method.
    pub depreciation_method: DepreciationMethod,
    /// Useful life in years.
    pub useful_life_years: u32,
    /// Residual value at the end of the useful life.
    pub salvage_value: Decimal,
    /// Depreciation applied through approved vouchers.
    pub accumulated_depreciation: Decimal,
    /// `acquisition_cost - accumulated_depreciation`.
    pub book_value: Decimal,
    /// Date the asset left service.
    pub disposal_date: Option<NaiveDate>,
}

impl FixedAsset {
    /// Total amount that may ever be depreciated.
    #[must_use]
    pub fn depreciable_amount(&self) -> Decimal {
        self.acquisition_cost - self.salvage_value
    }
}

/// Input for registering an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFixedAsset {
    /// Unique asset code.
    pub asset_code: String,
    /// Display name.
    pub name: String,
    /// Acquisition date.
    pub acquisition_date: NaiveDate,
    /// Acquisition cost.
    pub acquisition_cost: Decimal,
    /// Depreciation method.
    #[serde(default = "default_method")]
    pub depreciation_method: DepreciationMethod,
    /// Useful life in years.
    pub useful_life_years: u32,
    /// Residual value.
    #[serde(default)]
    pub salvage_value: Decimal,
}

const fn default_method() -> DepreciationMethod {
    DepreciationMethod::Straight
}

impl NewFixedAsset {
    /// Validates the input and returns the asset as first registered.
    ///
    /// # Errors
    ///
    /// `MissingField` or `InvalidInput` on the first violated rule.
    pub fn into_asset(self) -> Result<FixedAsset, LedgerError> {
        let asset_code = self.asset_code.trim().to_string();
        if asset_code.is_empty() {
            return Err(LedgerError::MissingField("asset_code"));
        }
        if self.acquisition_cost <= Decimal::ZERO {
            return Err(LedgerError::InvalidInput(
                "acquisition cost must be positive".into(),
            ));
        }
        if self.salvage_value < Decimal::ZERO || self.salvage_value > self.acquisition_cost {
            return Err(LedgerError::InvalidInput(
                "salvage value must be between 0 and the acquisition cost".into(),
            ));
        }
        if self.useful_life_years == 0 {
            return Err(LedgerError::InvalidInput(
                "useful life must be at least one year".into(),
            ));
        }

        Ok(FixedAsset {
            asset_code,
            name: self.name.trim().to_string(),
            acquisition_date: self.acquisition_date,
            acquisition_cost: self.acquisition_cost,
            depreciation_method: self.depreciation_method,
            useful_life_years: self.useful_life_years,
            salvage_value: self.salvage_value,
            accumulated_depreciation: Decimal::ZERO,
            book_value: self.acquisition_cost,
            disposal_date: None,
        })
    }
}

/// Depreciation state of an asset as of a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    /// Requested date.
    pub as_of_date: NaiveDate,
    /// Date actually used: the earlier of the request and the disposal date.
    pub effective_date: NaiveDate,
    /// Whole calendar months depreciated.
    pub months_elapsed: u32,
    /// Monthly charge, rounded to 2 decimals.
    pub monthly_depreciation: Decimal,
    /// Depreciation accumulated by the effective date.
    pub accumulated_depreciation: Decimal,
    /// `cost - accumulated_depreciation`.
    pub book_value: Decimal,
}

/// One month of the full straight-line plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based month index since acquisition.
    pub month_index: u32,
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: u32,
    /// Charge for the month.
    pub depreciation: Decimal,
    /// Accumulated depreciation at month end.
    pub accumulated_depreciation: Decimal,
    /// Book value at month end.
    pub book_value: Decimal,
}
