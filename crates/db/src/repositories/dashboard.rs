//! Dashboard repository: read-only projections for dashboards.

use chrono::{Datelike, NaiveDate};
use hoegye_core::LedgerError;
use hoegye_core::closing::ClosingPeriod;
use hoegye_core::depreciation::FixedAsset;
use hoegye_core::ledger::{Voucher, VoucherStatus, VoucherType};
use hoegye_shared::types::{PageRequest, PageResponse};
use sea_orm::sea_query::{Alias, Cond, Expr, Func, JoinType, Query, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;

use super::budget::{BudgetFilter, BudgetReportLine, budget_report};
use super::closing::ClosingRepository;
use super::error::db_err;
use super::fixed_asset::list_assets;
use super::voucher::header_to_voucher;
use crate::entities::{journal_details, journal_header, sea_orm_active_enums};

/// Filter for the voucher list.
#[derive(Debug, Clone, Default)]
pub struct VoucherFilter {
    /// First voucher date, inclusive.
    pub from: Option<NaiveDate>,
    /// Last voucher date, inclusive.
    pub to: Option<NaiveDate>,
    /// Voucher type.
    pub voucher_type: Option<VoucherType>,
    /// Status.
    pub status: Option<VoucherStatus>,
}

/// Voucher counts for a reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    /// Reference date.
    pub reference_date: NaiveDate,
    /// Vouchers dated on the reference date.
    pub today_count: u64,
    /// Vouchers awaiting approval.
    pub pending_count: u64,
    /// Vouchers whose header totals differ; always zero while the balance
    /// rule holds.
    pub unbalanced_count: u64,
    /// Vouchers dated from the first of the month through the reference date.
    pub month_to_date_count: u64,
}

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists voucher headers, newest first. Lines are not loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_vouchers(
        &self,
        filter: &VoucherFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<Voucher>, LedgerError> {
        let mut query = journal_header::Entity::find();
        if let Some(from) = filter.from {
            query = query.filter(journal_header::Column::VoucherDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journal_header::Column::VoucherDate.lte(to));
        }
        if let Some(voucher_type) = filter.voucher_type {
            query = query.filter(
                journal_header::Column::VoucherType
                    .eq(sea_orm_active_enums::VoucherType::from(voucher_type)),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(
                journal_header::Column::Status.eq(sea_orm_active_enums::VoucherStatus::from(status)),
            );
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let vouchers = query
            .order_by_desc(journal_header::Column::VoucherDate)
            .order_by_desc(journal_header::Column::VoucherNo)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|header| header_to_voucher(header, Vec::new()))
            .collect();

        Ok(PageResponse::new(vouchers, page, total))
    }

    /// Voucher counts around a reference date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn monthly_summary(&self, reference_date: NaiveDate) -> Result<MonthlySummary, LedgerError> {
        let month_start = reference_date.with_day(1).unwrap_or(reference_date);

        let today_count = journal_header::Entity::find()
            .filter(journal_header::Column::VoucherDate.eq(reference_date))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        let pending_count = journal_header::Entity::find()
            .filter(journal_header::Column::Status.eq(sea_orm_active_enums::VoucherStatus::Pending))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        let unbalanced_count = self.unbalanced_count().await?;
        let month_to_date_count = journal_header::Entity::find()
            .filter(journal_header::Column::VoucherDate.gte(month_start))
            .filter(journal_header::Column::VoucherDate.lte(reference_date))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        Ok(MonthlySummary {
            reference_date,
            today_count,
            pending_count,
            unbalanced_count,
            month_to_date_count,
        })
    }

    /// Counts vouchers whose stored lines disagree with each other or with
    /// the header totals.
    ///
    /// Creation writes both from the same validated lines, so a non-zero
    /// count means the ledger was changed outside the repositories.
    async fn unbalanced_count(&self) -> Result<u64, LedgerError> {
        let lines = Alias::new("lines");
        let line_debit = Alias::new("line_debit");
        let line_credit = Alias::new("line_credit");

        let sums = Query::select()
            .column(journal_details::Column::VoucherNo)
            .expr_as(Func::sum(Expr::col(journal_details::Column::DebitAmount)), line_debit.clone())
            .expr_as(Func::sum(Expr::col(journal_details::Column::CreditAmount)), line_credit.clone())
            .from(journal_details::Entity)
            .group_by_col(journal_details::Column::VoucherNo)
            .to_owned();

        // SQLite keeps money as REAL, so sums and totals are compared in
        // whole cents. Headers without lines count as zero on both sides.
        let cents = |expr: SimpleExpr| Expr::expr(Func::round_with_precision(expr, 2));
        let summed = |column: &Alias| {
            cents(
                Func::coalesce([
                    Expr::col((lines.clone(), column.clone())).into(),
                    Expr::val(0).into(),
                ])
                .into(),
            )
        };
        let header_total = |column: journal_header::Column| {
            cents(Expr::col((journal_header::Entity, column)).into())
        };

        let query = Query::select()
            .expr_as(
                Func::count(Expr::col((journal_header::Entity, journal_header::Column::VoucherNo))),
                Alias::new("unbalanced"),
            )
            .from(journal_header::Entity)
            .join_subquery(
                JoinType::LeftJoin,
                sums,
                lines.clone(),
                Expr::col((lines.clone(), journal_details::Column::VoucherNo))
                    .equals((journal_header::Entity, journal_header::Column::VoucherNo)),
            )
            .cond_where(
                Cond::any()
                    .add(summed(&line_debit).ne(summed(&line_credit)))
                    .add(summed(&line_debit).ne(header_total(journal_header::Column::TotalDebit)))
                    .add(summed(&line_credit).ne(header_total(journal_header::Column::TotalCredit))),
            )
            .to_owned();

        let backend = self.db.get_database_backend();
        let count: i64 = match self.db.query_one(backend.build(&query)).await.map_err(db_err)? {
            Some(row) => row.try_get("", "unbalanced").map_err(db_err)?,
            None => 0,
        };
        u64::try_from(count)
            .map_err(|_| LedgerError::Internal(format!("negative unbalanced count {count}")))
    }

    /// Budget vs actual by year, month and department.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn budget_vs_actual(&self, filter: &BudgetFilter) -> Result<Vec<BudgetReportLine>, LedgerError> {
        budget_report(&self.db, filter).await
    }

    /// Fixed-asset register with current book values.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn asset_register(&self) -> Result<Vec<FixedAsset>, LedgerError> {
        list_assets(&self.db).await
    }

    /// Recorded periods with their status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn periods(&self, year: Option<i32>) -> Result<Vec<ClosingPeriod>, LedgerError> {
        ClosingRepository::new(self.db.clone()).list(year).await
    }
}
