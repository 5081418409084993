//! Closing repository for accounting period gating and closing.

use chrono::NaiveDate;
use hoegye_core::LedgerError;
use hoegye_core::closing::{ClosingPeriod, PeriodCloser, PeriodKey, PeriodStatus, PeriodType};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};

use super::error::{db_err, to_i32, to_u32};
use crate::entities::{closing_master, journal_header, sea_orm_active_enums};

/// Primary key of a closing row.
#[must_use]
pub fn period_id(key: &PeriodKey) -> String {
    format!("{}-{:02}-{}", key.year, key.month, key.period_type)
}

/// Closing repository for period operations.
#[derive(Debug, Clone)]
pub struct ClosingRepository {
    db: DatabaseConnection,
}

impl ClosingRepository {
    /// Creates a new closing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Closes a monthly or annual period.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a month outside 1-12
    /// - `OpenVouchersExist` while draft or pending vouchers are dated inside
    /// - `PeriodAlreadyClosed` when the period is closed
    pub async fn close_period(
        &self,
        year: i32,
        month: u32,
        period_type: PeriodType,
        closed_by: &str,
        today: NaiveDate,
    ) -> Result<ClosingPeriod, LedgerError> {
        let key = PeriodKey::new(year, month, period_type)?;
        let id = period_id(&key);

        let txn = self.db.begin().await.map_err(db_err)?;

        lock_period_row(&txn, &key).await?;
        let current = closing_master::Entity::find_by_id(id.clone())
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::Internal(format!("closing row {id} vanished")))?;
        let current = model_to_period(current)?;

        let (start, end) = key.date_range()?;
        let open_vouchers = journal_header::Entity::find()
            .filter(journal_header::Column::Status.is_in([
                sea_orm_active_enums::VoucherStatus::Draft,
                sea_orm_active_enums::VoucherStatus::Pending,
            ]))
            .filter(journal_header::Column::VoucherDate.gte(start))
            .filter(journal_header::Column::VoucherDate.lt(end))
            .count(&txn)
            .await
            .map_err(db_err)?;

        let closed = match PeriodCloser::close(&current, open_vouchers, closed_by, today) {
            Ok(closed) => closed,
            Err(e) => {
                warn!(period = %id, open_vouchers, error = %e, "period close rejected");
                return Err(e);
            }
        };

        let result = closing_master::Entity::update_many()
            .set(closing_master::ActiveModel {
                status: Set(sea_orm_active_enums::PeriodStatus::Closed),
                closed_date: Set(closed.closed_date),
                closed_by: Set(closed.closed_by.clone()),
                ..Default::default()
            })
            .filter(closing_master::Column::PeriodId.eq(id.as_str()))
            .filter(closing_master::Column::Status.eq(sea_orm_active_enums::PeriodStatus::Open))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(LedgerError::PeriodAlreadyClosed {
                year: key.year,
                month: key.month,
                period_type: key.period_type,
            });
        }

        txn.commit().await.map_err(db_err)?;

        info!(period = %id, closed_by = ?closed.closed_by, "period closed");
        Ok(closed)
    }

    /// Returns true if postings dated `date` are allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_open(&self, date: NaiveDate) -> Result<bool, LedgerError> {
        let periods = periods_covering(&self.db, date).await?;
        Ok(PeriodCloser::is_open(date, &periods))
    }

    /// Lists recorded periods, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, year: Option<i32>) -> Result<Vec<ClosingPeriod>, LedgerError> {
        let mut query = closing_master::Entity::find();
        if let Some(year) = year {
            query = query.filter(closing_master::Column::Year.eq(year));
        }
        query
            .order_by_desc(closing_master::Column::Year)
            .order_by_desc(closing_master::Column::Month)
            .order_by_asc(closing_master::Column::PeriodType)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_period)
            .collect()
    }
}

/// Records the monthly and annual periods of a posting date on first use
/// and fails if either is closed.
///
/// Both rows stay locked until the caller's transaction ends, so a
/// concurrent close either sees the new voucher or is seen by it.
pub(crate) async fn ensure_posting_period<C: ConnectionTrait>(
    db: &C,
    date: NaiveDate,
) -> Result<(), LedgerError> {
    lock_period_row(db, &PeriodKey::monthly_for(date)).await?;
    lock_period_row(db, &PeriodKey::annual_for(date)).await?;
    ensure_open(db, date).await
}

/// Fails with `PeriodClosed` if the monthly or annual period of `date` is
/// closed.
pub(crate) async fn ensure_open<C: ConnectionTrait>(
    db: &C,
    date: NaiveDate,
) -> Result<(), LedgerError> {
    let periods = periods_covering(db, date).await?;
    PeriodCloser::ensure_open(date, &periods)
}

async fn periods_covering<C: ConnectionTrait>(
    db: &C,
    date: NaiveDate,
) -> Result<Vec<ClosingPeriod>, LedgerError> {
    let ids = [
        period_id(&PeriodKey::monthly_for(date)),
        period_id(&PeriodKey::annual_for(date)),
    ];
    closing_master::Entity::find()
        .filter(closing_master::Column::PeriodId.is_in(ids))
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(model_to_period)
        .collect()
}

/// Inserts the period row as open if it is missing, otherwise rewrites its
/// status unchanged. Either way the row is write-locked for the rest of the
/// transaction.
async fn lock_period_row<C: ConnectionTrait>(db: &C, key: &PeriodKey) -> Result<(), LedgerError> {
    let row = closing_master::ActiveModel {
        period_id: Set(period_id(key)),
        year: Set(key.year),
        month: Set(to_i32(key.month, "month")?),
        period_type: Set(key.period_type.into()),
        status: Set(sea_orm_active_enums::PeriodStatus::Open),
        closed_date: Set(None),
        closed_by: Set(None),
    };
    closing_master::Entity::insert(row)
        .on_conflict(
            OnConflict::column(closing_master::Column::PeriodId)
                .value(
                    closing_master::Column::Status,
                    Expr::col((closing_master::Entity, closing_master::Column::Status)),
                )
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

fn model_to_period(model: closing_master::Model) -> Result<ClosingPeriod, LedgerError> {
    Ok(ClosingPeriod {
        year: model.year,
        month: to_u32(model.month, "month")?,
        period_type: model.period_type.into(),
        status: PeriodStatus::from(model.status),
        closed_date: model.closed_date,
        closed_by: model.closed_by,
    })
}
