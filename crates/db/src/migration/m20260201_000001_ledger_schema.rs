//! Ledger schema.
//!
//! Creates the chart of accounts, vouchers, derived documents and closing
//! tables. Postgres gets exact `NUMERIC` money columns. `SQLite` (local runs
//! and tests) stores money as `REAL`, which is what sea-orm decodes
//! `Decimal` from; SQL aggregates over money round to cents before comparing.

use sea_orm::DatabaseBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let types = ColumnTypes::for_backend(manager.get_database_backend());

        for sql in schema_sql(&types) {
            db.execute_unprepared(&sql).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

struct ColumnTypes {
    money: &'static str,
    date: &'static str,
    timestamp: &'static str,
    uuid: &'static str,
}

impl ColumnTypes {
    const fn for_backend(backend: DatabaseBackend) -> Self {
        match backend {
            DatabaseBackend::Sqlite => Self {
                money: "REAL",
                date: "TEXT",
                timestamp: "TEXT",
                uuid: "BLOB",
            },
            _ => Self {
                money: "NUMERIC(20, 2)",
                date: "DATE",
                timestamp: "TIMESTAMPTZ",
                uuid: "UUID",
            },
        }
    }
}

fn schema_sql(t: &ColumnTypes) -> Vec<String> {
    let ColumnTypes {
        money,
        date,
        timestamp,
        uuid,
    } = t;

    vec![
        // Chart of accounts
        r"
CREATE TABLE account_master (
    code            VARCHAR(20) PRIMARY KEY,
    name            VARCHAR(100) NOT NULL,
    account_type    VARCHAR(16) NOT NULL
                    CHECK (account_type IN ('asset', 'liability', 'equity', 'revenue', 'expense')),
    parent_code     VARCHAR(20) REFERENCES account_master(code),
    level           INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1),
    is_control      BOOLEAN NOT NULL DEFAULT FALSE,
    is_active       BOOLEAN NOT NULL DEFAULT TRUE
)"
        .to_string(),
        // Vouchers
        format!(
            r"
CREATE TABLE journal_header (
    voucher_no              VARCHAR(20) PRIMARY KEY,
    voucher_date            {date} NOT NULL,
    voucher_type            VARCHAR(16) NOT NULL
                            CHECK (voucher_type IN ('receipt', 'payment', 'transfer', 'sales', 'purchase')),
    status                  VARCHAR(16) NOT NULL DEFAULT 'draft'
                            CHECK (status IN ('draft', 'pending', 'approved', 'cancelled')),
    total_debit             {money} NOT NULL DEFAULT 0,
    total_credit            {money} NOT NULL DEFAULT 0,
    description             TEXT,
    created_by              VARCHAR(50) NOT NULL,
    approved_by             VARCHAR(50),
    created_at              {timestamp} NOT NULL,
    approved_at             {timestamp},
    needs_manual_invoice    BOOLEAN NOT NULL DEFAULT FALSE
)"
        ),
        "CREATE INDEX idx_journal_header_date ON journal_header(voucher_date)".to_string(),
        "CREATE INDEX idx_journal_header_status ON journal_header(status)".to_string(),
        format!(
            r"
CREATE TABLE journal_details (
    voucher_no      VARCHAR(20) NOT NULL REFERENCES journal_header(voucher_no),
    line_no         INTEGER NOT NULL CHECK (line_no >= 1),
    account_code    VARCHAR(20) NOT NULL REFERENCES account_master(code),
    debit_amount    {money} NOT NULL DEFAULT 0 CHECK (debit_amount >= 0),
    credit_amount   {money} NOT NULL DEFAULT 0 CHECK (credit_amount >= 0),
    cost_center     VARCHAR(20),
    PRIMARY KEY (voucher_no, line_no),
    CHECK ((debit_amount > 0 AND credit_amount = 0) OR (debit_amount = 0 AND credit_amount > 0))
)"
        ),
        "CREATE INDEX idx_journal_details_account ON journal_details(account_code)".to_string(),
        format!(
            r"
CREATE TABLE voucher_sequence (
    voucher_date    {date} PRIMARY KEY,
    last_seq        INTEGER NOT NULL CHECK (last_seq >= 1)
)"
        ),
        // Derived documents
        format!(
            r"
CREATE TABLE tax_invoice (
    invoice_no      VARCHAR(20) PRIMARY KEY,
    invoice_type    VARCHAR(16) NOT NULL CHECK (invoice_type IN ('sales', 'purchase')),
    voucher_no      VARCHAR(20) NOT NULL UNIQUE REFERENCES journal_header(voucher_no),
    supply_amount   {money} NOT NULL,
    tax_amount      {money} NOT NULL,
    total_amount    {money} NOT NULL,
    status          VARCHAR(16) NOT NULL DEFAULT 'issued' CHECK (status IN ('issued')),
    issue_date      {date} NOT NULL
)"
        ),
        format!(
            r"
CREATE TABLE budget_master (
    budget_id       VARCHAR(64) PRIMARY KEY,
    year            INTEGER NOT NULL,
    month           INTEGER CHECK (month BETWEEN 1 AND 12),
    department      VARCHAR(20) NOT NULL,
    account_code    VARCHAR(20) NOT NULL REFERENCES account_master(code),
    budget_amount   {money} NOT NULL DEFAULT 0 CHECK (budget_amount >= 0),
    actual_amount   {money} NOT NULL DEFAULT 0,
    variance        {money} NOT NULL DEFAULT 0
)"
        ),
        "CREATE INDEX idx_budget_master_account_year ON budget_master(account_code, year)"
            .to_string(),
        format!(
            r"
CREATE TABLE fixed_asset (
    asset_code                  VARCHAR(20) PRIMARY KEY,
    name                        VARCHAR(100) NOT NULL,
    acquisition_date            {date} NOT NULL,
    acquisition_cost            {money} NOT NULL CHECK (acquisition_cost > 0),
    depreciation_method         VARCHAR(16) NOT NULL
                                CHECK (depreciation_method IN ('straight', 'declining', 'production')),
    useful_life_years           INTEGER NOT NULL CHECK (useful_life_years > 0),
    salvage_value               {money} NOT NULL DEFAULT 0 CHECK (salvage_value >= 0),
    accumulated_depreciation    {money} NOT NULL DEFAULT 0 CHECK (accumulated_depreciation >= 0),
    book_value                  {money} NOT NULL,
    disposal_date               {date}
)"
        ),
        format!(
            r"
CREATE TABLE depreciation_entry (
    id              {uuid} PRIMARY KEY,
    asset_code      VARCHAR(20) NOT NULL REFERENCES fixed_asset(asset_code),
    voucher_no      VARCHAR(20) NOT NULL UNIQUE REFERENCES journal_header(voucher_no),
    as_of_date      {date} NOT NULL,
    amount          {money} NOT NULL CHECK (amount > 0),
    status          VARCHAR(16) NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'applied', 'cancelled'))
)"
        ),
        "CREATE INDEX idx_depreciation_entry_asset ON depreciation_entry(asset_code, status)"
            .to_string(),
        // Closing
        format!(
            r"
CREATE TABLE closing_master (
    period_id       VARCHAR(20) PRIMARY KEY,
    year            INTEGER NOT NULL,
    month           INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    period_type     VARCHAR(16) NOT NULL CHECK (period_type IN ('monthly', 'annual')),
    status          VARCHAR(16) NOT NULL DEFAULT 'open' CHECK (status IN ('open', 'closed')),
    closed_date     {date},
    closed_by       VARCHAR(50),
    UNIQUE (year, month, period_type)
)"
        ),
    ]
}

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS closing_master;
DROP TABLE IF EXISTS depreciation_entry;
DROP TABLE IF EXISTS fixed_asset;
DROP TABLE IF EXISTS budget_master;
DROP TABLE IF EXISTS tax_invoice;
DROP TABLE IF EXISTS voucher_sequence;
DROP TABLE IF EXISTS journal_details;
DROP TABLE IF EXISTS journal_header;
DROP TABLE IF EXISTS account_master;
";
