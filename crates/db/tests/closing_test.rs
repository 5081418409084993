//! Period closing and posting gates.

mod common;

use common::{config, date, setup, simple_voucher};
use hoegye_core::LedgerError;
use hoegye_core::closing::{PeriodStatus, PeriodType};
use hoegye_core::ledger::VoucherType;
use hoegye_db::{ClosingRepository, VoucherRepository};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_open_vouchers_block_closing() {
    let t = setup().await;
    let closing = ClosingRepository::new(t.db.clone());
    let vouchers = VoucherRepository::new(t.db.clone(), config());

    let draft = vouchers
        .create(&simple_voucher(date(2025, 6, 3), VoucherType::Receipt, "111", "410", dec!(1000)))
        .await
        .unwrap();
    let pending = vouchers
        .create(&simple_voucher(date(2025, 6, 4), VoucherType::Receipt, "111", "410", dec!(2000)))
        .await
        .unwrap();
    vouchers.submit(&pending.voucher_no).await.unwrap();
    // Outside the month, so not counted.
    vouchers
        .create(&simple_voucher(date(2025, 7, 1), VoucherType::Receipt, "111", "410", dec!(3000)))
        .await
        .unwrap();

    assert!(matches!(
        closing
            .close_period(2025, 6, PeriodType::Monthly, "park", date(2025, 7, 2))
            .await,
        Err(LedgerError::OpenVouchersExist { count: 2 })
    ));

    vouchers.cancel(&draft.voucher_no).await.unwrap();
    vouchers.approve(&pending.voucher_no, "lee").await.unwrap();

    let closed = closing
        .close_period(2025, 6, PeriodType::Monthly, "park", date(2025, 7, 2))
        .await
        .unwrap();
    assert_eq!(closed.status, PeriodStatus::Closed);
    assert_eq!(closed.closed_by.as_deref(), Some("park"));
    assert_eq!(closed.closed_date, Some(date(2025, 7, 2)));
}

#[tokio::test]
async fn test_closing_twice_fails() {
    let t = setup().await;
    let closing = ClosingRepository::new(t.db.clone());

    closing
        .close_period(2025, 6, PeriodType::Monthly, "park", date(2025, 7, 2))
        .await
        .unwrap();
    assert!(matches!(
        closing
            .close_period(2025, 6, PeriodType::Monthly, "choi", date(2025, 7, 3))
            .await,
        Err(LedgerError::PeriodAlreadyClosed { year: 2025, month: 6, .. })
    ));
}

#[tokio::test]
async fn test_closed_month_rejects_new_vouchers() {
    let t = setup().await;
    let closing = ClosingRepository::new(t.db.clone());
    let vouchers = VoucherRepository::new(t.db.clone(), config());

    closing
        .close_period(2025, 6, PeriodType::Monthly, "park", date(2025, 7, 2))
        .await
        .unwrap();

    assert!(matches!(
        vouchers
            .create(&simple_voucher(date(2025, 6, 30), VoucherType::Receipt, "111", "410", dec!(1000)))
            .await,
        Err(LedgerError::PeriodClosed { year: 2025, month: 6 })
    ));
    vouchers
        .create(&simple_voucher(date(2025, 7, 1), VoucherType::Receipt, "111", "410", dec!(1000)))
        .await
        .unwrap();

    assert!(!closing.is_open(date(2025, 6, 15)).await.unwrap());
    assert!(closing.is_open(date(2025, 7, 15)).await.unwrap());
}

#[tokio::test]
async fn test_annual_close_covers_every_month() {
    let t = setup().await;
    let closing = ClosingRepository::new(t.db.clone());
    let vouchers = VoucherRepository::new(t.db.clone(), config());

    // The month argument is ignored for annual periods.
    let closed = closing
        .close_period(2024, 3, PeriodType::Annual, "park", date(2025, 1, 10))
        .await
        .unwrap();
    assert_eq!(closed.month, 12);

    assert!(matches!(
        vouchers
            .create(&simple_voucher(date(2024, 3, 15), VoucherType::Receipt, "111", "410", dec!(1000)))
            .await,
        Err(LedgerError::PeriodClosed { year: 2024, month: 3 })
    ));
    assert!(!closing.is_open(date(2024, 11, 1)).await.unwrap());
    assert!(closing.is_open(date(2025, 1, 1)).await.unwrap());
}

#[tokio::test]
async fn test_close_input_validation() {
    let t = setup().await;
    let closing = ClosingRepository::new(t.db.clone());

    assert!(matches!(
        closing
            .close_period(2025, 13, PeriodType::Monthly, "park", date(2025, 7, 2))
            .await,
        Err(LedgerError::InvalidInput(_))
    ));
    assert!(matches!(
        closing
            .close_period(2025, 6, PeriodType::Monthly, " ", date(2025, 7, 2))
            .await,
        Err(LedgerError::MissingField("closed_by"))
    ));
    assert!(closing.is_open(date(2025, 6, 1)).await.unwrap());
}

#[tokio::test]
async fn test_list_periods_newest_first() {
    let t = setup().await;
    let closing = ClosingRepository::new(t.db.clone());
    let vouchers = VoucherRepository::new(t.db.clone(), config());

    closing
        .close_period(2024, 12, PeriodType::Annual, "park", date(2025, 1, 10))
        .await
        .unwrap();
    // Posting opens the month's and the year's rows.
    vouchers
        .create(&simple_voucher(date(2025, 6, 3), VoucherType::Receipt, "111", "410", dec!(1000)))
        .await
        .unwrap();

    let all = closing.list(None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!((all[0].year, all[0].month, all[0].period_type), (2025, 12, PeriodType::Annual));
    assert_eq!(all[0].status, PeriodStatus::Open);
    assert_eq!((all[1].year, all[1].month, all[1].period_type), (2025, 6, PeriodType::Monthly));
    assert_eq!(all[1].status, PeriodStatus::Open);
    assert_eq!((all[2].year, all[2].period_type), (2024, PeriodType::Annual));
    assert_eq!(all[2].status, PeriodStatus::Closed);

    assert_eq!(closing.list(Some(2024)).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_close_and_create_never_strand_a_draft() {
    for _ in 0..5 {
        let t = setup().await;
        let closing = ClosingRepository::new(t.db.clone());
        let vouchers = VoucherRepository::new(t.db.clone(), config());

        let close = {
            let closing = closing.clone();
            tokio::spawn(async move {
                closing
                    .close_period(2025, 6, PeriodType::Monthly, "park", date(2025, 7, 2))
                    .await
            })
        };
        let create = {
            let vouchers = vouchers.clone();
            tokio::spawn(async move {
                vouchers
                    .create(&simple_voucher(date(2025, 6, 30), VoucherType::Receipt, "111", "410", dec!(1000)))
                    .await
            })
        };
        let (closed, created) = (close.await.unwrap(), create.await.unwrap());

        match (closed, created) {
            (Ok(_), Err(LedgerError::PeriodClosed { year: 2025, month: 6 }))
            | (Err(LedgerError::OpenVouchersExist { count: 1 }), Ok(_)) => {}
            other => panic!("close and create both landed or both failed: {other:?}"),
        }
    }
}
