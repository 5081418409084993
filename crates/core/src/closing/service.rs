//! Period closing rules.

use chrono::{Datelike, NaiveDate};

use super::period::{ClosingPeriod, PeriodKey, PeriodStatus};
use crate::error::LedgerError;

/// Stateless service for period gating and closing.
pub struct PeriodCloser;

impl PeriodCloser {
    /// Returns true if postings dated `date` are allowed.
    ///
    /// A date is closed when its monthly period or its year's annual period is
    /// closed. Periods without a record count as open.
    #[must_use]
    pub fn is_open<'a>(date: NaiveDate, periods: impl IntoIterator<Item = &'a ClosingPeriod>) -> bool {
        let monthly = PeriodKey::monthly_for(date);
        let annual = PeriodKey::annual_for(date);
        !periods
            .into_iter()
            .any(|p| p.is_closed() && (p.key() == monthly || p.key() == annual))
    }

    /// Fails with `PeriodClosed` when `date` is not open.
    ///
    /// # Errors
    ///
    /// `PeriodClosed` naming the year and month of the date.
    pub fn ensure_open<'a>(
        date: NaiveDate,
        periods: impl IntoIterator<Item = &'a ClosingPeriod>,
    ) -> Result<(), LedgerError> {
        if Self::is_open(date, periods) {
            Ok(())
        } else {
            Err(LedgerError::PeriodClosed {
                year: date.year(),
                month: date.month(),
            })
        }
    }

    /// Closes a period.
    ///
    /// `open_vouchers` is the number of draft or pending vouchers dated
    /// inside the period.
    ///
    /// # Errors
    ///
    /// - `MissingField` when `closed_by` is blank
    /// - `PeriodAlreadyClosed` when the period is closed
    /// - `OpenVouchersExist` when any voucher is still draft or pending
    pub fn close(
        current: &ClosingPeriod,
        open_vouchers: u64,
        closed_by: &str,
        today: NaiveDate,
    ) -> Result<ClosingPeriod, LedgerError> {
        let closed_by = closed_by.trim();
        if closed_by.is_empty() {
            return Err(LedgerError::MissingField("closed_by"));
        }
        if current.is_closed() {
            return Err(LedgerError::PeriodAlreadyClosed {
                year: current.year,
                month: current.month,
                period_type: current.period_type,
            });
        }
        if open_vouchers > 0 {
            return Err(LedgerError::OpenVouchersExist {
                count: open_vouchers,
            });
        }

        Ok(ClosingPeriod {
            status: PeriodStatus::Closed,
            closed_date: Some(today),
            closed_by: Some(closed_by.to_string()),
            ..current.clone()
        })
    }
}
