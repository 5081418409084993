//! Straight-line depreciation.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{DepreciationMethod, DepreciationSchedule, FixedAsset, ScheduleRow};
use crate::error::LedgerError;

/// Whole calendar months from the month of `from` to the month of `to`,
/// floored at zero.
#[must_use]
pub fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let months = (i64::from(to.year()) - i64::from(from.year())) * 12
        + (i64::from(to.month()) - i64::from(from.month()));
    u32::try_from(months.max(0)).unwrap_or(u32::MAX)
}

fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn ensure_supported(asset: &FixedAsset) -> Result<(), LedgerError> {
    match asset.depreciation_method {
        DepreciationMethod::Straight => Ok(()),
        method @ (DepreciationMethod::Declining | DepreciationMethod::Production) => Err(
            LedgerError::NotImplemented(format!("{method} depreciation")),
        ),
    }
}

fn life_months(asset: &FixedAsset) -> u32 {
    asset.useful_life_years.saturating_mul(12).max(1)
}

/// Accumulated depreciation after `months` whole months, rounded to cents
/// and capped at the depreciable amount.
fn accumulated_after(asset: &FixedAsset, months: u32) -> Decimal {
    let total = life_months(asset);
    let months = months.min(total);
    let depreciable = asset.depreciable_amount();
    round_money(depreciable * Decimal::from(months) / Decimal::from(total)).min(depreciable)
}

/// Computes the depreciation state of an asset as of a date.
///
/// Depreciation is frozen at the disposal date when the asset is disposed.
///
/// # Errors
///
/// `NotImplemented` for declining-balance and production methods.
pub fn compute_monthly_depreciation(
    asset: &FixedAsset,
    as_of_date: NaiveDate,
) -> Result<DepreciationSchedule, LedgerError> {
    ensure_supported(asset)?;

    let effective_date = asset
        .disposal_date
        .map_or(as_of_date, |disposed| disposed.min(as_of_date));
    let total = life_months(asset);
    let months_elapsed = months_between(asset.acquisition_date, effective_date).min(total);
    let accumulated = accumulated_after(asset, months_elapsed);

    Ok(DepreciationSchedule {
        as_of_date,
        effective_date,
        months_elapsed,
        monthly_depreciation: round_money(asset.depreciable_amount() / Decimal::from(total)),
        accumulated_depreciation: accumulated,
        book_value: asset.acquisition_cost - accumulated,
    })
}

/// Month-by-month plan over the useful life, cut at the disposal month.
///
/// Monthly charges are differences of rounded accumulated values, so they sum
/// exactly to the final accumulated depreciation.
///
/// # Errors
///
/// `NotImplemented` for declining-balance and production methods.
pub fn build_schedule(asset: &FixedAsset) -> Result<Vec<ScheduleRow>, LedgerError> {
    ensure_supported(asset)?;

    let mut last = life_months(asset);
    if let Some(disposed) = asset.disposal_date {
        last = last.min(months_between(asset.acquisition_date, disposed));
    }

    let start = asset.acquisition_date;
    let mut rows = Vec::with_capacity(usize::try_from(last).unwrap_or_default());
    let mut previous = Decimal::ZERO;
    for month_index in 1..=last {
        let accumulated = accumulated_after(asset, month_index);
        let (year, month) = shift_month(start.year(), start.month(), month_index);
        rows.push(ScheduleRow {
            month_index,
            year,
            month,
            depreciation: accumulated - previous,
            accumulated_depreciation: accumulated,
            book_value: asset.acquisition_cost - accumulated,
        });
        previous = accumulated;
    }
    Ok(rows)
}

fn shift_month(year: i32, month: u32, by: u32) -> (i32, u32) {
    let zero_based = month - 1 + by;
    let years = i32::try_from(zero_based / 12).unwrap_or(i32::MAX);
    (year.saturating_add(years), zero_based % 12 + 1)
}

/// Depreciation still to be posted to reach the target as of `as_of_date`,
/// given what is applied on the asset and what waits in unapproved vouchers.
///
/// # Errors
///
/// `NotImplemented` for declining-balance and production methods.
pub fn depreciation_due(
    asset: &FixedAsset,
    as_of_date: NaiveDate,
    pending: Decimal,
) -> Result<Decimal, LedgerError> {
    let target = compute_monthly_depreciation(asset, as_of_date)?.accumulated_depreciation;
    Ok((target - asset.accumulated_depreciation - pending).max(Decimal::ZERO))
}

/// Applies an approved depreciation amount.
///
/// Returns the new `(accumulated, book_value)`. Accumulated depreciation
/// never decreases and never exceeds `cost - salvage`.
#[must_use]
pub fn apply_depreciation(asset: &FixedAsset, amount: Decimal) -> (Decimal, Decimal) {
    let accumulated = (asset.accumulated_depreciation + amount)
        .min(asset.depreciable_amount())
        .max(asset.accumulated_depreciation);
    (accumulated, asset.acquisition_cost - accumulated)
}
