//! Voucher domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Voucher type, deciding which derived documents approval produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherType {
    /// Cash received.
    Receipt,
    /// Cash paid out.
    Payment,
    /// Non-cash transfer between accounts.
    Transfer,
    /// Sale, linked to a sales tax invoice.
    Sales,
    /// Purchase, linked to a purchase tax invoice.
    Purchase,
}

impl VoucherType {
    /// Lowercase name as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Payment => "payment",
            Self::Transfer => "transfer",
            Self::Sales => "sales",
            Self::Purchase => "purchase",
        }
    }

    /// Returns true if approval must link a tax invoice.
    #[must_use]
    pub const fn requires_tax_invoice(self) -> bool {
        matches!(self, Self::Sales | Self::Purchase)
    }
}

impl fmt::Display for VoucherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoucherType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receipt" => Ok(Self::Receipt),
            "payment" => Ok(Self::Payment),
            "transfer" => Ok(Self::Transfer),
            "sales" => Ok(Self::Sales),
            "purchase" => Ok(Self::Purchase),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown voucher type '{other}'"
            ))),
        }
    }
}

/// Voucher status in the approval workflow.
///
/// - Draft → Pending (submit)
/// - Pending → Approved (approve)
/// - Draft | Pending → Cancelled (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherStatus {
    /// Being prepared.
    Draft,
    /// Awaiting approval.
    Pending,
    /// Approved (terminal).
    Approved,
    /// Cancelled (terminal).
    Cancelled,
}

impl VoucherStatus {
    /// Lowercase name as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Cancelled)
    }

    /// Statuses that block a period from closing.
    pub const OPEN: [Self; 2] = [Self::Draft, Self::Pending];
}

impl fmt::Display for VoucherStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoucherStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown voucher status '{other}'"
            ))),
        }
    }
}

/// One line of a voucher creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// Target account code.
    pub account_code: String,
    /// Debit amount (zero when crediting).
    #[serde(default)]
    pub debit_amount: Decimal,
    /// Credit amount (zero when debiting).
    #[serde(default)]
    pub credit_amount: Decimal,
    /// Cost centre (department) the line is charged to.
    #[serde(default)]
    pub cost_center: Option<String>,
}

impl JournalLineInput {
    /// Debit line.
    #[must_use]
    pub fn debit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            debit_amount: amount,
            credit_amount: Decimal::ZERO,
            cost_center: None,
        }
    }

    /// Credit line.
    #[must_use]
    pub fn credit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            debit_amount: Decimal::ZERO,
            credit_amount: amount,
            cost_center: None,
        }
    }

    /// Charges the line to a cost centre.
    #[must_use]
    pub fn with_cost_center(mut self, cost_center: Option<String>) -> Self {
        self.cost_center = cost_center;
        self
    }
}

/// Request to create a voucher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVoucherInput {
    /// Posting date.
    pub voucher_date: NaiveDate,
    /// Voucher type.
    pub voucher_type: VoucherType,
    /// Lines in display order.
    pub lines: Vec<JournalLineInput>,
    /// Creating user or producing module.
    pub created_by: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Debit and credit totals of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherTotals {
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
}

impl VoucherTotals {
    /// Sums debit and credit over `(debit, credit)` pairs.
    #[must_use]
    pub fn from_amounts(amounts: impl IntoIterator<Item = (Decimal, Decimal)>) -> Self {
        amounts.into_iter().fold(
            Self {
                total_debit: Decimal::ZERO,
                total_credit: Decimal::ZERO,
            },
            |acc, (debit, credit)| Self {
                total_debit: acc.total_debit + debit,
                total_credit: acc.total_credit + credit,
            },
        )
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }
}

/// A stored voucher line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// 1-based position within the voucher.
    pub line_no: u32,
    /// Target account code.
    pub account_code: String,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
    /// Cost centre.
    pub cost_center: Option<String>,
}

/// A voucher that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedVoucher {
    /// Posting date.
    pub voucher_date: NaiveDate,
    /// Voucher type.
    pub voucher_type: VoucherType,
    /// Numbered lines.
    pub lines: Vec<JournalLine>,
    /// Header totals.
    pub totals: VoucherTotals,
    /// Creating user.
    pub created_by: String,
    /// Description.
    pub description: Option<String>,
}

/// A stored voucher with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    /// `JV-YYYYMMDD-NNNN`.
    pub voucher_no: String,
    /// Posting date.
    pub voucher_date: NaiveDate,
    /// Voucher type.
    pub voucher_type: VoucherType,
    /// Workflow status.
    pub status: VoucherStatus,
    /// Header debit total.
    pub total_debit: Decimal,
    /// Header credit total.
    pub total_credit: Decimal,
    /// Description.
    pub description: Option<String>,
    /// Creating user.
    pub created_by: String,
    /// Approving user.
    pub approved_by: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Approval time.
    pub approved_at: Option<DateTime<Utc>>,
    /// Set when tax invoice linkage failed on approval.
    pub needs_manual_invoice: bool,
    /// Lines ordered by `line_no`.
    pub lines: Vec<JournalLine>,
}

impl Voucher {
    /// Header totals.
    #[must_use]
    pub const fn totals(&self) -> VoucherTotals {
        VoucherTotals {
            total_debit: self.total_debit,
            total_credit: self.total_credit,
        }
    }
}
