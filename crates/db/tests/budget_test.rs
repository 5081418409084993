//! Budget plans and actuals derived from approved vouchers.

mod common;

use chrono::NaiveDate;
use common::{date, setup, simple_voucher};
use futures::future::join_all;
use hoegye_core::LedgerError;
use hoegye_core::budget::{PlanBudgetInput, VarianceStatus};
use hoegye_core::ledger::{CreateVoucherInput, JournalLineInput, VoucherType};
use hoegye_db::{BudgetFilter, BudgetReportLine, BudgetRepository, VoucherRepository};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;

fn plan(month: Option<u32>, department: &str, account_code: &str, amount: Decimal) -> PlanBudgetInput {
    PlanBudgetInput {
        year: 2025,
        month,
        department: department.into(),
        account_code: account_code.into(),
        budget_amount: amount,
    }
}

/// Expense paid in cash, charged to each `(cost_center, amount)` pair.
fn expense(voucher_date: NaiveDate, charges: &[(Option<&str>, Decimal)]) -> CreateVoucherInput {
    let mut lines: Vec<JournalLineInput> = charges
        .iter()
        .map(|(cost_center, amount)| {
            JournalLineInput::debit("830", *amount).with_cost_center(cost_center.map(str::to_string))
        })
        .collect();
    let total: Decimal = charges.iter().map(|(_, amount)| *amount).sum();
    lines.push(JournalLineInput::credit("111", total));
    CreateVoucherInput {
        voucher_date,
        voucher_type: VoucherType::Payment,
        lines,
        created_by: "kim".into(),
        description: None,
    }
}

async fn post_approved(db: &DatabaseConnection, input: &CreateVoucherInput) {
    let repo = VoucherRepository::new(db.clone(), common::config());
    let voucher = repo.create(input).await.unwrap();
    repo.submit(&voucher.voucher_no).await.unwrap();
    repo.approve(&voucher.voucher_no, "lee").await.unwrap();
}

fn find<'a>(report: &'a [BudgetReportLine], month: Option<u32>, department: &str) -> &'a BudgetReportLine {
    report
        .iter()
        .find(|r| r.line.month == month && r.line.department == department)
        .expect("budget row")
}

#[tokio::test]
async fn test_plan_starts_with_zero_actual() {
    let t = setup().await;
    let budgets = BudgetRepository::new(t.db.clone());

    let line = budgets.plan(&plan(Some(6), "ALL", "830", dec!(500000))).await.unwrap();

    assert_eq!(line.line.budget_id, "2025-06-ALL-830");
    assert_eq!(line.line.actual_amount, Decimal::ZERO);
    assert_eq!(line.line.variance, dec!(-500000));
    assert_eq!(line.analysis.unwrap().status, VarianceStatus::Favorable);
}

#[tokio::test]
async fn test_replanning_keeps_one_row() {
    let t = setup().await;
    let budgets = BudgetRepository::new(t.db.clone());

    budgets.plan(&plan(Some(6), "ALL", "830", dec!(500000))).await.unwrap();
    let line = budgets.plan(&plan(Some(6), "ALL", "830", dec!(800000))).await.unwrap();
    assert_eq!(line.line.budget_amount, dec!(800000));

    let report = budgets
        .report(&BudgetFilter { year: 2025, ..BudgetFilter::default() })
        .await
        .unwrap();
    assert_eq!(report.len(), 1);
}

#[tokio::test]
async fn test_only_approved_vouchers_count() {
    let t = setup().await;
    let budgets = BudgetRepository::new(t.db.clone());
    let vouchers = VoucherRepository::new(t.db.clone(), common::config());
    budgets.plan(&plan(Some(6), "ALL", "830", dec!(500000))).await.unwrap();

    post_approved(&t.db, &expense(date(2025, 6, 10), &[(None, dec!(300000))])).await;
    // Draft and pending vouchers stay out of the actual.
    vouchers
        .create(&simple_voucher(date(2025, 6, 11), VoucherType::Payment, "830", "111", dec!(40000)))
        .await
        .unwrap();
    let pending = vouchers
        .create(&simple_voucher(date(2025, 6, 12), VoucherType::Payment, "830", "111", dec!(50000)))
        .await
        .unwrap();
    vouchers.submit(&pending.voucher_no).await.unwrap();
    // So does another month.
    post_approved(&t.db, &expense(date(2025, 7, 1), &[(None, dec!(90000))])).await;

    let report = budgets
        .report(&BudgetFilter { year: 2025, month: Some(6), department: None })
        .await
        .unwrap();
    let june = find(&report, Some(6), "ALL");
    assert_eq!(june.line.actual_amount, dec!(300000));
    assert_eq!(june.line.variance, dec!(-200000));
    let analysis = june.analysis.as_ref().unwrap();
    assert_eq!(analysis.utilization_percent, dec!(60));
    assert_eq!(analysis.status, VarianceStatus::Favorable);
}

#[tokio::test]
async fn test_department_budgets_follow_cost_centers() {
    let t = setup().await;
    let budgets = BudgetRepository::new(t.db.clone());
    budgets.plan(&plan(Some(6), "SALES", "830", dec!(100000))).await.unwrap();
    budgets.plan(&plan(Some(6), "ALL", "830", dec!(100000))).await.unwrap();

    post_approved(
        &t.db,
        &expense(
            date(2025, 6, 10),
            &[(Some("SALES"), dec!(150000)), (Some("OPS"), dec!(70000)), (None, dec!(5000))],
        ),
    )
    .await;

    let report = budgets
        .report(&BudgetFilter { year: 2025, month: Some(6), department: None })
        .await
        .unwrap();
    let sales = find(&report, Some(6), "SALES");
    assert_eq!(sales.line.actual_amount, dec!(150000));
    assert_eq!(sales.line.variance, dec!(50000));
    assert_eq!(sales.analysis.as_ref().unwrap().status, VarianceStatus::Unfavorable);
    assert_eq!(find(&report, Some(6), "ALL").line.actual_amount, dec!(225000));

    let only_sales = budgets
        .report(&BudgetFilter {
            year: 2025,
            month: None,
            department: Some("SALES".into()),
        })
        .await
        .unwrap();
    assert_eq!(only_sales.len(), 1);
}

#[tokio::test]
async fn test_annual_budget_spans_the_year() {
    let t = setup().await;
    let budgets = BudgetRepository::new(t.db.clone());
    budgets.plan(&plan(None, "ALL", "830", dec!(1200000))).await.unwrap();

    post_approved(&t.db, &expense(date(2025, 3, 3), &[(None, dec!(100000))])).await;
    post_approved(&t.db, &expense(date(2025, 11, 3), &[(None, dec!(200000))])).await;
    post_approved(&t.db, &expense(date(2026, 1, 3), &[(None, dec!(400000))])).await;

    let report = budgets
        .report(&BudgetFilter { year: 2025, ..BudgetFilter::default() })
        .await
        .unwrap();
    let annual = find(&report, None, "ALL");
    assert_eq!(annual.line.budget_id, "2025-00-ALL-830");
    assert_eq!(annual.line.actual_amount, dec!(300000));
}

#[tokio::test]
async fn test_planning_after_postings_picks_up_history() {
    let t = setup().await;
    let budgets = BudgetRepository::new(t.db.clone());
    post_approved(&t.db, &expense(date(2025, 6, 10), &[(None, dec!(300000))])).await;

    let line = budgets.plan(&plan(Some(6), "ALL", "830", dec!(200000))).await.unwrap();
    assert_eq!(line.line.actual_amount, dec!(300000));
    assert_eq!(line.line.variance, dec!(100000));
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let t = setup().await;
    let budgets = BudgetRepository::new(t.db.clone());
    budgets.plan(&plan(Some(6), "ALL", "830", dec!(500000))).await.unwrap();
    budgets.plan(&plan(None, "ALL", "830", dec!(900000))).await.unwrap();
    post_approved(&t.db, &expense(date(2025, 6, 10), &[(None, dec!(300000))])).await;

    let first = budgets.recompute("830", 2025, 6).await.unwrap();
    let second = budgets.recompute("830", 2025, 6).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert!(first.iter().all(|line| line.actual_amount == dec!(300000)));
}

#[tokio::test]
async fn test_plan_validation() {
    let t = setup().await;
    let budgets = BudgetRepository::new(t.db.clone());

    assert!(matches!(
        budgets.plan(&plan(Some(6), "ALL", "8", dec!(1000))).await,
        Err(LedgerError::InvalidInput(_))
    ));
    assert!(matches!(
        budgets.plan(&plan(Some(13), "ALL", "830", dec!(1000))).await,
        Err(LedgerError::InvalidInput(_))
    ));
    assert!(matches!(
        budgets.plan(&plan(Some(6), "  ", "830", dec!(1000))).await,
        Err(LedgerError::MissingField("department"))
    ));
    assert!(matches!(
        budgets.plan(&plan(Some(6), "ALL", "830", dec!(-1))).await,
        Err(LedgerError::InvalidInput(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_approvals_keep_every_posting_in_the_actual() {
    let t = setup().await;
    let budgets = BudgetRepository::new(t.db.clone());
    let repo = VoucherRepository::new(t.db.clone(), common::config());
    budgets.plan(&plan(Some(6), "ALL", "830", dec!(100000))).await.unwrap();

    let mut numbers = Vec::new();
    for day in 1..=8 {
        let voucher = repo
            .create(&expense(date(2025, 6, day), &[(None, dec!(1000))]))
            .await
            .unwrap();
        repo.submit(&voucher.voucher_no).await.unwrap();
        numbers.push(voucher.voucher_no);
    }

    let approvals = numbers.into_iter().map(|no| {
        let repo = repo.clone();
        tokio::spawn(async move { repo.approve(&no, "lee").await })
    });
    for result in join_all(approvals).await {
        result.unwrap().unwrap();
    }

    let filter = BudgetFilter {
        year: 2025,
        month: Some(6),
        department: None,
    };
    let stored = budgets.report(&filter).await.unwrap();
    assert_eq!(find(&stored, Some(6), "ALL").line.actual_amount, dec!(8000));

    let recomputed = budgets.recompute("830", 2025, 6).await.unwrap();
    assert_eq!(recomputed.len(), 1);
    assert_eq!(recomputed[0].actual_amount, dec!(8000));
    assert_eq!(recomputed[0].variance, dec!(-92000));
}
