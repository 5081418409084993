//! Budget repository: plans and actuals recomputed from approved vouchers.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use hoegye_core::LedgerError;
use hoegye_core::account::{AccountCatalog, AccountType};
use hoegye_core::budget::{
    ApprovedPosting, BudgetLine, BudgetService, PlanBudgetInput, VarianceResult, budget_id,
};
use hoegye_core::closing::{PeriodKey, PeriodType};
use hoegye_core::ledger::Voucher;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info};

use super::account::load_catalog;
use super::error::{db_err, to_i32, to_u32};
use crate::entities::{
    account_master, budget_master, journal_details, journal_header, sea_orm_active_enums,
};

/// Filter for budget reports.
#[derive(Debug, Clone, Default)]
pub struct BudgetFilter {
    /// Fiscal year.
    pub year: i32,
    /// Month; `None` selects every row of the year.
    pub month: Option<u32>,
    /// Department.
    pub department: Option<String>,
}

/// Budget line with its variance analysis.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetReportLine {
    /// Stored line.
    #[serde(flatten)]
    pub line: BudgetLine,
    /// Account type, when the account still exists.
    pub account_type: Option<AccountType>,
    /// Variance analysis.
    pub analysis: Option<VarianceResult>,
}

/// Budget repository.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates or replaces a budget amount and recomputes its actual.
    ///
    /// # Errors
    ///
    /// Validation errors from [`BudgetService::validate_plan`], or a database
    /// failure.
    pub async fn plan(&self, input: &PlanBudgetInput) -> Result<BudgetReportLine, LedgerError> {
        let catalog = load_catalog(&self.db).await?;
        BudgetService::validate_plan(input, &catalog)?;

        let department = input.department.trim();
        let id = budget_id(input.year, input.month, department, &input.account_code);
        let month = input.month.map(|m| to_i32(m, "month")).transpose()?;

        let txn = self.db.begin().await.map_err(db_err)?;
        lock_account(&txn, &input.account_code).await?;

        let row = budget_master::ActiveModel {
            budget_id: Set(id.clone()),
            year: Set(input.year),
            month: Set(month),
            department: Set(department.to_string()),
            account_code: Set(input.account_code.clone()),
            budget_amount: Set(input.budget_amount),
            actual_amount: Set(Decimal::ZERO),
            variance: Set(-input.budget_amount),
        };
        budget_master::Entity::insert(row)
            .on_conflict(
                OnConflict::column(budget_master::Column::BudgetId)
                    .update_column(budget_master::Column::BudgetAmount)
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(db_err)?;

        let model = budget_master::Entity::find_by_id(id.clone())
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::Internal(format!("budget row {id} vanished")))?;
        let line = recompute_row(&txn, &catalog, model).await?;

        txn.commit().await.map_err(db_err)?;

        info!(budget_id = %id, amount = %input.budget_amount, actual = %line.actual_amount, "budget planned");
        Ok(report_line(line, &catalog))
    }

    /// Recomputes the actuals of every budget row touched by postings to
    /// `account_code` in the given month: the monthly rows of that month and
    /// the annual rows of the year.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` for an unknown account, or a database failure.
    pub async fn recompute(
        &self,
        account_code: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<BudgetLine>, LedgerError> {
        let catalog = load_catalog(&self.db).await?;
        let txn = self.db.begin().await.map_err(db_err)?;
        let lines = recompute_account_month(&txn, &catalog, account_code, year, month).await?;
        txn.commit().await.map_err(db_err)?;
        Ok(lines)
    }

    /// Budget vs actual report.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn report(&self, filter: &BudgetFilter) -> Result<Vec<BudgetReportLine>, LedgerError> {
        budget_report(&self.db, filter).await
    }
}

/// Budget rows with variance analysis, ordered by month, department and
/// account.
pub(crate) async fn budget_report<C: ConnectionTrait>(
    db: &C,
    filter: &BudgetFilter,
) -> Result<Vec<BudgetReportLine>, LedgerError> {
    let catalog = load_catalog(db).await?;

    let mut query =
        budget_master::Entity::find().filter(budget_master::Column::Year.eq(filter.year));
    if let Some(month) = filter.month {
        query = query.filter(budget_master::Column::Month.eq(to_i32(month, "month")?));
    }
    if let Some(department) = &filter.department {
        query = query.filter(budget_master::Column::Department.eq(department.as_str()));
    }

    query
        .order_by_asc(budget_master::Column::Month)
        .order_by_asc(budget_master::Column::Department)
        .order_by_asc(budget_master::Column::AccountCode)
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|model| model_to_line(model).map(|line| report_line(line, &catalog)))
        .collect()
}

/// Recomputes budgets for every distinct (account, year, month) a voucher
/// touches.
pub(crate) async fn recompute_for_voucher<C: ConnectionTrait>(
    db: &C,
    catalog: &AccountCatalog,
    voucher: &Voucher,
) -> Result<(), LedgerError> {
    let year = voucher.voucher_date.year();
    let month = voucher.voucher_date.month();
    let accounts: BTreeSet<&str> = voucher
        .lines
        .iter()
        .map(|line| line.account_code.as_str())
        .collect();

    for account_code in accounts {
        recompute_account_month(db, catalog, account_code, year, month).await?;
    }
    Ok(())
}

async fn recompute_account_month<C: ConnectionTrait>(
    db: &C,
    catalog: &AccountCatalog,
    account_code: &str,
    year: i32,
    month: u32,
) -> Result<Vec<BudgetLine>, LedgerError> {
    lock_account(db, account_code).await?;

    let rows = budget_master::Entity::find()
        .filter(budget_master::Column::AccountCode.eq(account_code))
        .filter(budget_master::Column::Year.eq(year))
        .filter(
            Condition::any()
                .add(budget_master::Column::Month.eq(to_i32(month, "month")?))
                .add(budget_master::Column::Month.is_null()),
        )
        .order_by_asc(budget_master::Column::BudgetId)
        .lock_exclusive()
        .all(db)
        .await
        .map_err(db_err)?;

    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        lines.push(recompute_row(db, catalog, row).await?);
    }
    debug!(account_code, year, month, rows = lines.len(), "budget actuals recomputed");
    Ok(lines)
}

/// Write-locks the account row until the transaction ends.
///
/// Every recompute of an account's budgets holds this lock before it sums
/// postings. A concurrent approval or plan for the same account waits, then
/// sums with the other's voucher already committed, so the stored actual
/// never loses an approval.
async fn lock_account<C: ConnectionTrait>(db: &C, account_code: &str) -> Result<(), LedgerError> {
    account_master::Entity::find_by_id(account_code)
        .lock_exclusive()
        .one(db)
        .await
        .map_err(db_err)?
        .ok_or_else(|| LedgerError::AccountNotFound(account_code.to_string()))?;
    Ok(())
}

async fn recompute_row<C: ConnectionTrait>(
    db: &C,
    catalog: &AccountCatalog,
    row: budget_master::Model,
) -> Result<BudgetLine, LedgerError> {
    let key = match row.month {
        Some(month) => PeriodKey::new(row.year, to_u32(month, "month")?, PeriodType::Monthly)?,
        None => PeriodKey::new(row.year, 12, PeriodType::Annual)?,
    };
    let (start, end) = key.date_range()?;
    let postings = approved_postings(db, &row.account_code, start, end).await?;

    let normal_balance = catalog
        .account_type(&row.account_code)
        .ok_or_else(|| LedgerError::AccountNotFound(row.account_code.clone()))?
        .normal_balance();
    let actual = BudgetService::actual_amount(normal_balance, &row.department, &postings);
    let variance = actual - row.budget_amount;

    let mut active: budget_master::ActiveModel = row.into();
    active.actual_amount = Set(actual);
    active.variance = Set(variance);
    let updated = active.update(db).await.map_err(db_err)?;

    model_to_line(updated)
}

async fn approved_postings<C: ConnectionTrait>(
    db: &C,
    account_code: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ApprovedPosting>, LedgerError> {
    let rows: Vec<(Option<String>, Decimal, Decimal)> = journal_details::Entity::find()
        .join(
            sea_orm::JoinType::InnerJoin,
            journal_details::Relation::JournalHeader.def(),
        )
        .filter(journal_details::Column::AccountCode.eq(account_code))
        .filter(
            journal_header::Column::Status.eq(sea_orm_active_enums::VoucherStatus::Approved),
        )
        .filter(journal_header::Column::VoucherDate.gte(start))
        .filter(journal_header::Column::VoucherDate.lt(end))
        .select_only()
        .column(journal_details::Column::CostCenter)
        .column(journal_details::Column::DebitAmount)
        .column(journal_details::Column::CreditAmount)
        .into_tuple()
        .all(db)
        .await
        .map_err(db_err)?;

    Ok(rows
        .into_iter()
        .map(|(cost_center, debit_amount, credit_amount)| ApprovedPosting {
            cost_center,
            debit_amount,
            credit_amount,
        })
        .collect())
}

fn report_line(line: BudgetLine, catalog: &AccountCatalog) -> BudgetReportLine {
    let account_type = catalog.account_type(&line.account_code);
    let analysis = account_type.map(|account_type| {
        BudgetService::calculate_variance(line.budget_amount, line.actual_amount, account_type)
    });
    BudgetReportLine {
        line,
        account_type,
        analysis,
    }
}

fn model_to_line(model: budget_master::Model) -> Result<BudgetLine, LedgerError> {
    Ok(BudgetLine {
        month: model.month.map(|m| to_u32(m, "month")).transpose()?,
        budget_id: model.budget_id,
        year: model.year,
        department: model.department,
        account_code: model.account_code,
        budget_amount: model.budget_amount,
        actual_amount: model.actual_amount,
        variance: model.variance,
    })
}
