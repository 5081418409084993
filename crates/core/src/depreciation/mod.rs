//! Fixed-asset depreciation.
//!
//! Only the straight-line method has a formula; the declining-balance and
//! production methods are accepted in the register but rejected when a
//! schedule is requested.

pub mod schedule;
pub mod types;

#[cfg(test)]
mod schedule_props;

pub use schedule::{
    apply_depreciation, build_schedule, compute_monthly_depreciation, depreciation_due,
    months_between,
};
pub use types::{
    DepreciationMethod, DepreciationSchedule, FixedAsset, NewFixedAsset, ScheduleRow,
};
