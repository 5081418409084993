//! Budget data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Department code whose budgets count every line regardless of cost centre.
pub const COMPANY_WIDE_DEPARTMENT: &str = "ALL";

/// Budget identifier: `{year}-{MM|00}-{department}-{account_code}`.
///
/// Annual budgets use `00` for the month.
#[must_use]
pub fn budget_id(year: i32, month: Option<u32>, department: &str, account_code: &str) -> String {
    format!("{year}-{:02}-{department}-{account_code}", month.unwrap_or(0))
}

/// A budget line with its derived actual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    /// Derived identifier.
    pub budget_id: String,
    /// Budget year.
    pub year: i32,
    /// Budget month, `None` for annual budgets.
    pub month: Option<u32>,
    /// Department (cost centre) or `ALL`.
    pub department: String,
    /// Budgeted account.
    pub account_code: String,
    /// Planned amount.
    pub budget_amount: Decimal,
    /// Signed sum of approved postings.
    pub actual_amount: Decimal,
    /// `actual_amount - budget_amount`.
    pub variance: Decimal,
}

/// Input for planning a budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanBudgetInput {
    /// Budget year.
    pub year: i32,
    /// Budget month, omitted for annual budgets.
    #[serde(default)]
    pub month: Option<u32>,
    /// Department (cost centre) or `ALL`.
    pub department: String,
    /// Budgeted account.
    pub account_code: String,
    /// Planned amount.
    pub budget_amount: Decimal,
}

/// One approved voucher line, as seen by the budget recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedPosting {
    /// Line cost centre.
    pub cost_center: Option<String>,
    /// Debit amount.
    pub debit_amount: Decimal,
    /// Credit amount.
    pub credit_amount: Decimal,
}

/// Variance calculation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarianceResult {
    /// Budgeted amount.
    pub budgeted: Decimal,
    /// Actual amount.
    pub actual: Decimal,
    /// `actual - budgeted`.
    pub variance: Decimal,
    /// Variance as a percentage of the budget.
    pub variance_percent: Decimal,
    /// Utilization percentage.
    pub utilization_percent: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceStatus {
    /// Under budget for debit-normal accounts, over target for credit-normal ones.
    Favorable,
    /// Over budget for debit-normal accounts, under target for credit-normal ones.
    Unfavorable,
    /// On budget (no variance).
    OnBudget,
}
