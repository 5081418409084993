//! Property-based tests for straight-line depreciation.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::schedule::{apply_depreciation, compute_monthly_depreciation};
use super::types::{DepreciationMethod, FixedAsset};

fn arb_asset() -> impl Strategy<Value = FixedAsset> {
    (1i64..10_000_000_000i64, 0u32..=100u32, 1u32..=40u32, 0u64..3650u64).prop_map(
        |(cost_cents, salvage_pct, life, offset)| {
            let cost = Decimal::new(cost_cents, 2);
            let salvage = (cost * Decimal::from(salvage_pct) / Decimal::ONE_HUNDRED).round_dp(2);
            let acquired = NaiveDate::from_ymd_opt(2015, 1, 1)
                .unwrap()
                .checked_add_days(Days::new(offset))
                .unwrap();
            FixedAsset {
                asset_code: "FA".into(),
                name: "asset".into(),
                acquisition_date: acquired,
                acquisition_cost: cost,
                depreciation_method: DepreciationMethod::Straight,
                useful_life_years: life,
                salvage_value: salvage,
                accumulated_depreciation: Decimal::ZERO,
                book_value: cost,
                disposal_date: None,
            }
        },
    )
}

fn date_after(start: NaiveDate, days: u64) -> NaiveDate {
    start.checked_add_days(Days::new(days)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Book value never increases as the as-of date moves forward and never
    /// drops below salvage.
    #[test]
    fn prop_book_value_non_increasing(
        asset in arb_asset(),
        first in 0u64..20_000,
        gap in 0u64..20_000,
    ) {
        let earlier = date_after(asset.acquisition_date, first);
        let later = date_after(earlier, gap);

        let a = compute_monthly_depreciation(&asset, earlier).unwrap();
        let b = compute_monthly_depreciation(&asset, later).unwrap();

        prop_assert!(b.book_value <= a.book_value);
        prop_assert!(b.book_value >= asset.salvage_value);
        prop_assert_eq!(b.book_value, asset.acquisition_cost - b.accumulated_depreciation);
    }

    /// Nothing accrues after disposal.
    #[test]
    fn prop_disposal_freezes(
        mut asset in arb_asset(),
        disposed_after in 0u64..10_000,
        queried_after in 0u64..10_000,
    ) {
        let disposal = date_after(asset.acquisition_date, disposed_after);
        asset.disposal_date = Some(disposal);

        let at = compute_monthly_depreciation(&asset, disposal).unwrap();
        let later = compute_monthly_depreciation(&asset, date_after(disposal, queried_after)).unwrap();
        prop_assert_eq!(at.accumulated_depreciation, later.accumulated_depreciation);
    }

    /// Repeated application keeps the asset within bounds.
    #[test]
    fn prop_apply_stays_within_bounds(
        mut asset in arb_asset(),
        amounts in prop::collection::vec(-1_000_000i64..1_000_000_000i64, 1..20),
    ) {
        for cents in amounts {
            let before = asset.accumulated_depreciation;
            let (accumulated, book) = apply_depreciation(&asset, Decimal::new(cents, 2));
            prop_assert!(accumulated >= before);
            prop_assert!(book >= asset.salvage_value);
            asset.accumulated_depreciation = accumulated;
            asset.book_value = book;
        }
    }
}
