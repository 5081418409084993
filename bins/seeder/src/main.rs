//! Database seeder for Hoegye development and testing.
//!
//! Seeds a chart of accounts, one voucher per template type, a budget and a
//! fixed asset. Accounts are skipped when they exist; sample data is only
//! written into an empty ledger.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use hoegye_core::account::{AccountType, NewAccount};
use hoegye_core::budget::PlanBudgetInput;
use hoegye_core::depreciation::{DepreciationMethod, NewFixedAsset};
use hoegye_core::ledger::VoucherTemplate;
use hoegye_db::migration::{Migrator, MigratorTrait};
use hoegye_db::{
    AccountRepository, BudgetRepository, DashboardRepository, FixedAssetRepository,
    VoucherFilter, VoucherRepository,
};
use hoegye_shared::types::PageRequest;
use hoegye_shared::{AppConfig, LedgerConfig};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing::info;

/// `(code, name, type, parent, is_control)`
const CHART: &[(&str, &str, AccountType, Option<&str>, bool)] = &[
    ("1", "Assets", AccountType::Asset, None, true),
    ("101", "Cash", AccountType::Asset, Some("1"), false),
    ("103", "Ordinary deposits", AccountType::Asset, Some("1"), false),
    ("108", "Accounts receivable", AccountType::Asset, Some("1"), false),
    ("135", "VAT receivable", AccountType::Asset, Some("1"), false),
    ("206", "Machinery", AccountType::Asset, Some("1"), false),
    ("209", "Accumulated depreciation", AccountType::Asset, Some("1"), false),
    ("2", "Liabilities", AccountType::Liability, None, true),
    ("251", "Accounts payable", AccountType::Liability, Some("2"), false),
    ("255", "VAT payable", AccountType::Liability, Some("2"), false),
    ("3", "Equity", AccountType::Equity, None, true),
    ("331", "Capital stock", AccountType::Equity, Some("3"), false),
    ("4", "Revenue", AccountType::Revenue, None, true),
    ("404", "Product sales", AccountType::Revenue, Some("4"), false),
    ("8", "Expenses", AccountType::Expense, None, true),
    ("811", "Employee benefits", AccountType::Expense, Some("8"), false),
    ("818", "Depreciation expense", AccountType::Expense, Some("8"), false),
    ("830", "Supplies expense", AccountType::Expense, Some("8"), false),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;
    let ledger = AppConfig::load().map(|c| c.ledger).unwrap_or_default();

    info!("Connecting to database...");
    let db = hoegye_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    seed_chart(&db).await?;

    let existing = DashboardRepository::new(db.clone())
        .list_vouchers(&VoucherFilter::default(), &PageRequest::new(1, 1))
        .await?;
    if existing.meta.total > 0 {
        info!(vouchers = existing.meta.total, "Ledger not empty, skipping sample data");
        return Ok(());
    }

    seed_vouchers(&db, &ledger).await?;
    seed_budget(&db).await?;
    seed_asset(&db, &ledger).await?;

    info!("Seeding complete!");
    Ok(())
}

fn date(y: i32, m: u32, d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid date {y}-{m}-{d}"))
}

fn won(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

async fn seed_chart(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = AccountRepository::new(db.clone());
    let mut created = 0;
    for (code, name, account_type, parent, is_control) in CHART {
        if repo.find_by_code(code).await?.is_some() {
            continue;
        }
        repo.create(&NewAccount {
            code: (*code).to_string(),
            name: (*name).to_string(),
            account_type: *account_type,
            parent_code: parent.map(str::to_string),
            is_control: *is_control,
        })
        .await?;
        created += 1;
    }
    info!(created, total = CHART.len(), "Chart of accounts seeded");
    Ok(())
}

/// One voucher per template; all but the last are approved.
async fn seed_vouchers(db: &DatabaseConnection, ledger: &LedgerConfig) -> anyhow::Result<()> {
    let repo = VoucherRepository::new(db.clone(), ledger.clone());
    let samples = [
        (VoucherTemplate::receipt("103", "331", won(500_000_000)), date(2025, 6, 2)?, None),
        (VoucherTemplate::sales("108", "404", "255", won(12_000_000)), date(2025, 6, 5)?, Some("SALES")),
        (VoucherTemplate::purchase("251", "830", "135", won(3_400_000)), date(2025, 6, 9)?, Some("PROD")),
        (VoucherTemplate::payment("103", "811", won(1_800_000)), date(2025, 6, 20)?, Some("PROD")),
        (VoucherTemplate::transfer("101", "103", won(2_000_000)), date(2025, 6, 27)?, None),
    ];
    let last = samples.len() - 1;

    for (index, (template, voucher_date, cost_center)) in samples.into_iter().enumerate() {
        let voucher = repo
            .create_from_template(template, voucher_date, "seeder", None, cost_center)
            .await?;
        if index == last {
            info!(voucher_no = %voucher.voucher_no, "Left in draft");
            continue;
        }
        repo.submit(&voucher.voucher_no).await?;
        let outcome = repo.approve(&voucher.voucher_no, "seeder").await?;
        info!(voucher_no = %voucher.voucher_no, invoice = ?outcome.invoice, "Voucher approved");
    }
    Ok(())
}

async fn seed_budget(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = BudgetRepository::new(db.clone());
    for (month, department, account_code, amount) in [
        (Some(6), "ALL", "404", won(10_000_000)),
        (Some(6), "PROD", "830", won(3_000_000)),
        (None, "ALL", "811", won(24_000_000)),
    ] {
        let line = repo
            .plan(&PlanBudgetInput {
                year: 2025,
                month,
                department: department.to_string(),
                account_code: account_code.to_string(),
                budget_amount: amount,
            })
            .await?;
        info!(budget_id = %line.line.budget_id, actual = %line.line.actual_amount, "Budget planned");
    }
    Ok(())
}

async fn seed_asset(db: &DatabaseConnection, ledger: &LedgerConfig) -> anyhow::Result<()> {
    let repo = FixedAssetRepository::new(db.clone(), ledger.clone());
    let asset = repo
        .register(NewFixedAsset {
            asset_code: "FA-0001".to_string(),
            name: "CNC lathe".to_string(),
            acquisition_date: date(2023, 6, 1)?,
            acquisition_cost: won(120_000_000),
            depreciation_method: DepreciationMethod::Straight,
            useful_life_years: 10,
            salvage_value: won(10_000_000),
        })
        .await?;

    if let Some(voucher) = repo
        .post_depreciation(&asset.asset_code, date(2025, 6, 30)?, "seeder")
        .await?
    {
        info!(voucher_no = %voucher.voucher_no, amount = %voucher.total_debit, "Depreciation posted");
    }
    Ok(())
}
