//! Accounting period types.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Closing granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// One calendar month.
    Monthly,
    /// One calendar year, stored with month 12.
    Annual,
}

impl PeriodType {
    /// Lowercase name as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "annual" => Ok(Self::Annual),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown period type '{other}'"
            ))),
        }
    }
}

/// Status of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Accepts postings.
    Open,
    /// Closed for good.
    Closed,
}

impl PeriodStatus {
    /// Lowercase name as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Identifies a closable period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
    /// Calendar year.
    pub year: i32,
    /// Calendar month; always 12 for annual periods.
    pub month: u32,
    /// Granularity.
    pub period_type: PeriodType,
}

impl PeriodKey {
    /// Creates a key, normalizing annual periods to month 12.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a monthly period has a month outside 1-12 or the
    /// year is not representable.
    pub fn new(year: i32, month: u32, period_type: PeriodType) -> Result<Self, LedgerError> {
        let month = match period_type {
            PeriodType::Annual => 12,
            PeriodType::Monthly if (1..=12).contains(&month) => month,
            PeriodType::Monthly => {
                return Err(LedgerError::InvalidInput(format!(
                    "month {month} is out of range"
                )));
            }
        };
        let key = Self {
            year,
            month,
            period_type,
        };
        key.date_range()?;
        Ok(key)
    }

    /// Monthly period containing a date.
    #[must_use]
    pub fn monthly_for(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            period_type: PeriodType::Monthly,
        }
    }

    /// Annual period containing a date.
    #[must_use]
    pub fn annual_for(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: 12,
            period_type: PeriodType::Annual,
        }
    }

    /// Half-open date range `[start, end)` covered by the period.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the range cannot be represented.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate), LedgerError> {
        let invalid = || {
            LedgerError::InvalidInput(format!(
                "period {}-{:02} is not representable",
                self.year, self.month
            ))
        };
        let next_year = |year: i32| year.checked_add(1).and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
        let (start, end) = match self.period_type {
            PeriodType::Monthly => {
                let start = NaiveDate::from_ymd_opt(self.year, self.month, 1);
                let end = if self.month == 12 {
                    next_year(self.year)
                } else {
                    NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
                };
                (start, end)
            }
            PeriodType::Annual => (
                NaiveDate::from_ymd_opt(self.year, 1, 1),
                next_year(self.year),
            ),
        };
        Ok((start.ok_or_else(invalid)?, end.ok_or_else(invalid)?))
    }

    /// Returns true if the date falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self.period_type {
            PeriodType::Monthly => date.year() == self.year && date.month() == self.month,
            PeriodType::Annual => date.year() == self.year,
        }
    }
}

/// A closing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingPeriod {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (12 for annual).
    pub month: u32,
    /// Granularity.
    pub period_type: PeriodType,
    /// Status.
    pub status: PeriodStatus,
    /// Date it was closed.
    pub closed_date: Option<NaiveDate>,
    /// User who closed it.
    pub closed_by: Option<String>,
}

impl ClosingPeriod {
    /// Open record for a key, as created by the first posting.
    #[must_use]
    pub const fn open(key: PeriodKey) -> Self {
        Self {
            year: key.year,
            month: key.month,
            period_type: key.period_type,
            status: PeriodStatus::Open,
            closed_date: None,
            closed_by: None,
        }
    }

    /// Key of this record.
    #[must_use]
    pub const fn key(&self) -> PeriodKey {
        PeriodKey {
            year: self.year,
            month: self.month,
            period_type: self.period_type,
        }
    }

    /// Returns true if the period is closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == PeriodStatus::Closed
    }
}
