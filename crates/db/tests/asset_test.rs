//! Fixed asset register, depreciation vouchers and disposal.

mod common;

use chrono::NaiveDate;
use common::{config, date, setup};
use futures::future::join_all;
use hoegye_core::LedgerError;
use hoegye_core::depreciation::{DepreciationMethod, NewFixedAsset};
use hoegye_core::ledger::{VoucherStatus, VoucherType};
use hoegye_db::entities::depreciation_entry;
use hoegye_db::entities::sea_orm_active_enums::DepreciationEntryStatus;
use hoegye_db::{FixedAssetRepository, VoucherRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

fn lathe(code: &str, acquisition_date: NaiveDate) -> NewFixedAsset {
    NewFixedAsset {
        asset_code: code.into(),
        name: "CNC lathe".into(),
        acquisition_date,
        acquisition_cost: dec!(120000000),
        depreciation_method: DepreciationMethod::Straight,
        useful_life_years: 10,
        salvage_value: dec!(10000000),
    }
}

#[tokio::test]
async fn test_register_and_duplicate() {
    let t = setup().await;
    let assets = FixedAssetRepository::new(t.db.clone(), config());

    let asset = assets.register(lathe("FA-001", date(2023, 6, 1))).await.unwrap();
    assert_eq!(asset.book_value, dec!(120000000));
    assert_eq!(asset.accumulated_depreciation, Decimal::ZERO);
    assert_eq!(assets.get("FA-001").await.unwrap(), asset);

    assert!(matches!(
        assets.register(lathe("FA-001", date(2024, 1, 1))).await,
        Err(LedgerError::DuplicateAsset(code)) if code == "FA-001"
    ));
    assert!(matches!(
        assets
            .register(NewFixedAsset { useful_life_years: 0, ..lathe("FA-002", date(2024, 1, 1)) })
            .await,
        Err(LedgerError::InvalidInput(_))
    ));
    assert!(matches!(assets.get("FA-404").await, Err(LedgerError::AssetNotFound(_))));
}

#[tokio::test]
async fn test_depreciation_voucher_applies_on_approval() {
    let t = setup().await;
    let assets = FixedAssetRepository::new(t.db.clone(), config());
    let vouchers = VoucherRepository::new(t.db.clone(), config());
    assets.register(lathe("FA-001", date(2023, 6, 1))).await.unwrap();

    let as_of = assets.depreciation_as_of("FA-001", date(2025, 6, 30)).await.unwrap();
    assert_eq!(as_of.months_elapsed, 24);
    assert_eq!(as_of.accumulated_depreciation, dec!(22000000));

    let voucher = assets
        .post_depreciation("FA-001", date(2025, 6, 30), "system")
        .await
        .unwrap()
        .expect("depreciation due");
    assert_eq!(voucher.voucher_type, VoucherType::Transfer);
    assert_eq!(voucher.status, VoucherStatus::Draft);
    assert_eq!(voucher.total_debit, dec!(22000000));
    assert_eq!(voucher.lines[0].account_code, "818");
    assert_eq!(voucher.lines[1].account_code, "209");

    // Nothing moves on the asset until approval.
    assert_eq!(assets.get("FA-001").await.unwrap().accumulated_depreciation, Decimal::ZERO);

    vouchers.submit(&voucher.voucher_no).await.unwrap();
    vouchers.approve(&voucher.voucher_no, "lee").await.unwrap();

    let asset = assets.get("FA-001").await.unwrap();
    assert_eq!(asset.accumulated_depreciation, dec!(22000000));
    assert_eq!(asset.book_value, dec!(98000000));

    assert!(
        assets
            .post_depreciation("FA-001", date(2025, 6, 30), "system")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_pending_voucher_blocks_double_posting_until_cancelled() {
    let t = setup().await;
    let assets = FixedAssetRepository::new(t.db.clone(), config());
    let vouchers = VoucherRepository::new(t.db.clone(), config());
    assets.register(lathe("FA-001", date(2023, 6, 1))).await.unwrap();

    let first = assets
        .post_depreciation("FA-001", date(2025, 6, 30), "system")
        .await
        .unwrap()
        .expect("depreciation due");
    assert!(
        assets
            .post_depreciation("FA-001", date(2025, 6, 30), "system")
            .await
            .unwrap()
            .is_none()
    );

    vouchers.cancel(&first.voucher_no).await.unwrap();

    let second = assets
        .post_depreciation("FA-001", date(2025, 6, 30), "system")
        .await
        .unwrap()
        .expect("cancelled posting frees the amount");
    assert_ne!(second.voucher_no, first.voucher_no);
    assert_eq!(second.total_debit, dec!(22000000));

    // Approving the cancelled one is refused and leaves the asset alone.
    assert!(vouchers.approve(&first.voucher_no, "lee").await.is_err());
    assert_eq!(assets.get("FA-001").await.unwrap().accumulated_depreciation, Decimal::ZERO);
}

#[tokio::test]
async fn test_nothing_due_before_first_month() {
    let t = setup().await;
    let assets = FixedAssetRepository::new(t.db.clone(), config());
    assets.register(lathe("FA-001", date(2025, 6, 1))).await.unwrap();

    assert!(
        assets
            .post_depreciation("FA-001", date(2025, 6, 30), "system")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_disposal_freezes_depreciation() {
    let t = setup().await;
    let assets = FixedAssetRepository::new(t.db.clone(), config());
    assets.register(lathe("FA-001", date(2023, 6, 1))).await.unwrap();

    let disposed = assets.dispose("FA-001", date(2024, 6, 15)).await.unwrap();
    assert_eq!(disposed.disposal_date, Some(date(2024, 6, 15)));

    let as_of = assets.depreciation_as_of("FA-001", date(2025, 6, 30)).await.unwrap();
    assert_eq!(as_of.effective_date, date(2024, 6, 15));
    assert_eq!(as_of.months_elapsed, 12);
    assert_eq!(as_of.accumulated_depreciation, dec!(11000000));
    assert_eq!(assets.schedule("FA-001").await.unwrap().len(), 12);

    // Same date again is a no-op; another date is refused.
    assets.dispose("FA-001", date(2024, 6, 15)).await.unwrap();
    assert!(matches!(
        assets.dispose("FA-001", date(2024, 7, 1)).await,
        Err(LedgerError::AssetAlreadyDisposed { disposal_date, .. }) if disposal_date == date(2024, 6, 15)
    ));
}

#[tokio::test]
async fn test_disposal_before_acquisition_is_rejected() {
    let t = setup().await;
    let assets = FixedAssetRepository::new(t.db.clone(), config());
    assets.register(lathe("FA-001", date(2023, 6, 1))).await.unwrap();

    assert!(matches!(
        assets.dispose("FA-001", date(2023, 5, 31)).await,
        Err(LedgerError::InvalidInput(_))
    ));
    assert!(assets.get("FA-001").await.unwrap().disposal_date.is_none());
}

#[tokio::test]
async fn test_unsupported_methods_are_reported() {
    let t = setup().await;
    let assets = FixedAssetRepository::new(t.db.clone(), config());
    assets
        .register(NewFixedAsset {
            depreciation_method: DepreciationMethod::Declining,
            ..lathe("FA-009", date(2023, 6, 1))
        })
        .await
        .unwrap();

    assert!(matches!(
        assets.depreciation_as_of("FA-009", date(2025, 6, 30)).await,
        Err(LedgerError::NotImplemented(_))
    ));
    assert!(matches!(
        assets.post_depreciation("FA-009", date(2025, 6, 30), "system").await,
        Err(LedgerError::NotImplemented(_))
    ));
}

#[tokio::test]
async fn test_register_lists_in_code_order() {
    let t = setup().await;
    let assets = FixedAssetRepository::new(t.db.clone(), config());
    assets.register(lathe("FA-002", date(2024, 1, 1))).await.unwrap();
    assets.register(lathe("FA-001", date(2023, 6, 1))).await.unwrap();

    let codes: Vec<String> = assets.list().await.unwrap().into_iter().map(|a| a.asset_code).collect();
    assert_eq!(codes, ["FA-001", "FA-002"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_depreciation_approvals_accumulate() {
    let t = setup().await;
    let assets = FixedAssetRepository::new(t.db.clone(), config());
    let vouchers = VoucherRepository::new(t.db.clone(), config());
    assets.register(lathe("FA-001", date(2023, 6, 1))).await.unwrap();

    // The second posting only covers what the first leaves due.
    let mut numbers = Vec::new();
    for as_of in [date(2024, 6, 30), date(2025, 6, 30)] {
        let voucher = assets
            .post_depreciation("FA-001", as_of, "system")
            .await
            .unwrap()
            .expect("depreciation due");
        assert_eq!(voucher.total_debit, dec!(11000000));
        vouchers.submit(&voucher.voucher_no).await.unwrap();
        numbers.push(voucher.voucher_no);
    }

    let approvals = numbers.into_iter().map(|no| {
        let vouchers = vouchers.clone();
        tokio::spawn(async move { vouchers.approve(&no, "lee").await })
    });
    for result in join_all(approvals).await {
        result.unwrap().unwrap();
    }

    let asset = assets.get("FA-001").await.unwrap();
    assert_eq!(asset.accumulated_depreciation, dec!(22000000));
    assert_eq!(asset.book_value, dec!(98000000));

    let applied: Decimal = depreciation_entry::Entity::find()
        .filter(depreciation_entry::Column::AssetCode.eq("FA-001"))
        .filter(depreciation_entry::Column::Status.eq(DepreciationEntryStatus::Applied))
        .all(&t.db)
        .await
        .unwrap()
        .iter()
        .map(|entry| entry.amount)
        .sum();
    assert_eq!(applied, asset.accumulated_depreciation);

    assert!(
        assets
            .post_depreciation("FA-001", date(2025, 6, 30), "system")
            .await
            .unwrap()
            .is_none()
    );
}
