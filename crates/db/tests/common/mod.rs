//! Shared fixtures for the integration suites: a migrated database seeded
//! with a small chart of accounts.
//!
//! Suites run on a `SQLite` file in a temporary directory. Setting
//! `TEST_DATABASE_URL` to a Postgres URL runs them on Postgres instead, each
//! test in its own fresh schema, which is where the row locks taken by
//! concurrent approvals actually matter.

#![allow(dead_code)]

use chrono::NaiveDate;
use hoegye_core::account::{AccountType, NewAccount};
use hoegye_core::ledger::{CreateVoucherInput, JournalLineInput, VoucherType};
use hoegye_db::AccountRepository;
use hoegye_db::migration::{Migrator, MigratorTrait};
use hoegye_shared::LedgerConfig;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tempfile::TempDir;
use uuid::Uuid;

/// Migrated database; a `SQLite` directory lives as long as the fixture.
pub struct TestDb {
    pub db: DatabaseConnection,
    _dir: Option<TempDir>,
}

pub async fn setup() -> TestDb {
    let test_db = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) if url.starts_with("postgres") => postgres(&url).await,
        _ => sqlite().await,
    };
    Migrator::up(&test_db.db, None).await.expect("migrate");
    seed_chart(&test_db.db).await;
    test_db
}

async fn sqlite() -> TestDb {
    let dir = TempDir::new().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("ledger.db").display());
    let db = hoegye_db::connect_with_pool(&url, 8, 1)
        .await
        .expect("connect");
    TestDb { db, _dir: Some(dir) }
}

/// Schemas are left behind for inspection; drop `ledger_test_*` to clean up.
async fn postgres(url: &str) -> TestDb {
    let schema = format!("ledger_test_{}", Uuid::new_v4().simple());
    let admin = Database::connect(url).await.expect("connect");
    admin
        .execute_unprepared(&format!("CREATE SCHEMA \"{schema}\""))
        .await
        .expect("create schema");
    admin.close().await.expect("close");

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(16)
        .min_connections(1)
        .set_schema_search_path(schema)
        .sqlx_logging(false);
    let db = Database::connect(options).await.expect("connect");
    TestDb { db, _dir: None }
}

pub fn config() -> LedgerConfig {
    LedgerConfig::default()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Control accounts are single digits; everything else is postable.
const CHART: &[(&str, &str, AccountType, Option<&str>, bool)] = &[
    ("1", "Assets", AccountType::Asset, None, true),
    ("108", "Accounts receivable", AccountType::Asset, Some("1"), false),
    ("111", "Cash", AccountType::Asset, Some("1"), false),
    ("135", "VAT receivable", AccountType::Asset, Some("1"), false),
    ("209", "Accumulated depreciation", AccountType::Asset, Some("1"), false),
    ("2", "Liabilities", AccountType::Liability, None, true),
    ("251", "Accounts payable", AccountType::Liability, Some("2"), false),
    ("255", "VAT payable", AccountType::Liability, Some("2"), false),
    ("3", "Equity", AccountType::Equity, None, true),
    ("331", "Capital stock", AccountType::Equity, Some("3"), false),
    ("4", "Revenue", AccountType::Revenue, None, true),
    ("404", "Product sales", AccountType::Revenue, Some("4"), false),
    ("410", "Service revenue", AccountType::Revenue, Some("4"), false),
    ("8", "Expenses", AccountType::Expense, None, true),
    ("818", "Depreciation expense", AccountType::Expense, Some("8"), false),
    ("830", "Supplies expense", AccountType::Expense, Some("8"), false),
    ("831", "Utilities expense", AccountType::Expense, Some("8"), false),
];

async fn seed_chart(db: &DatabaseConnection) {
    let repo = AccountRepository::new(db.clone());
    for (code, name, account_type, parent, is_control) in CHART {
        repo.create(&NewAccount {
            code: (*code).to_string(),
            name: (*name).to_string(),
            account_type: *account_type,
            parent_code: parent.map(str::to_string),
            is_control: *is_control,
        })
        .await
        .expect("seed account");
    }
}

/// Two-line voucher moving `amount` from `credit` to `debit`.
pub fn simple_voucher(
    voucher_date: NaiveDate,
    voucher_type: VoucherType,
    debit: &str,
    credit: &str,
    amount: Decimal,
) -> CreateVoucherInput {
    CreateVoucherInput {
        voucher_date,
        voucher_type,
        lines: vec![
            JournalLineInput::debit(debit, amount),
            JournalLineInput::credit(credit, amount),
        ],
        created_by: "kim".into(),
        description: None,
    }
}
