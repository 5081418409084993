//! Budget service for actual recomputation, variance and plan validation.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::types::{ApprovedPosting, COMPANY_WIDE_DEPARTMENT, PlanBudgetInput, VarianceResult, VarianceStatus};
use crate::account::{AccountCatalog, AccountType, NormalBalance};
use crate::error::LedgerError;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Returns true if a line charged to `cost_center` counts toward a budget
    /// of `department`.
    #[must_use]
    pub fn counts_toward(department: &str, cost_center: Option<&str>) -> bool {
        department == COMPANY_WIDE_DEPARTMENT || cost_center == Some(department)
    }

    /// Full recompute of an actual amount from approved postings.
    ///
    /// The caller selects postings by account, status and date; this applies
    /// the department filter and the account's sign convention.
    #[must_use]
    pub fn actual_amount<'a>(
        normal_balance: NormalBalance,
        department: &str,
        postings: impl IntoIterator<Item = &'a ApprovedPosting>,
    ) -> Decimal {
        postings
            .into_iter()
            .filter(|p| Self::counts_toward(department, p.cost_center.as_deref()))
            .map(|p| normal_balance.calculate_balance_change(p.debit_amount, p.credit_amount))
            .sum()
    }

    /// Calculate variance between budgeted and actual amounts.
    ///
    /// The variance is always `actual - budgeted`. Whether it is favorable
    /// depends on the account's normal balance:
    /// - debit-normal (asset, expense): spending under budget is favorable
    /// - credit-normal (liability, equity, revenue): exceeding target is favorable
    #[must_use]
    pub fn calculate_variance(
        budgeted: Decimal,
        actual: Decimal,
        account_type: AccountType,
    ) -> VarianceResult {
        let variance = actual - budgeted;

        let direction = match account_type.normal_balance() {
            NormalBalance::Debit => budgeted.cmp(&actual),
            NormalBalance::Credit => actual.cmp(&budgeted),
        };
        let status = match direction {
            Ordering::Greater => VarianceStatus::Favorable,
            Ordering::Less => VarianceStatus::Unfavorable,
            Ordering::Equal => VarianceStatus::OnBudget,
        };

        let variance_percent = if budgeted.is_zero() {
            Decimal::ZERO
        } else {
            (variance / budgeted * Decimal::ONE_HUNDRED).round_dp(2)
        };

        let utilization_percent = if budgeted.is_zero() {
            Decimal::ZERO
        } else {
            (actual / budgeted * Decimal::ONE_HUNDRED).round_dp(2)
        };

        VarianceResult {
            budgeted,
            actual,
            variance,
            variance_percent,
            utilization_percent,
            status,
        }
    }

    /// Validate a budget plan.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a month outside 1-12 or a negative amount
    /// - `MissingField` for a blank department
    /// - `InvalidInput` when the account cannot receive postings
    pub fn validate_plan(input: &PlanBudgetInput, catalog: &AccountCatalog) -> Result<(), LedgerError> {
        if let Some(month) = input.month
            && !(1..=12).contains(&month)
        {
            return Err(LedgerError::InvalidInput(format!("month {month} is out of range")));
        }
        if input.department.trim().is_empty() {
            return Err(LedgerError::MissingField("department"));
        }
        if input.budget_amount < Decimal::ZERO {
            return Err(LedgerError::InvalidInput(
                "budget amount cannot be negative".into(),
            ));
        }
        if !catalog.is_postable(&input.account_code) {
            return Err(LedgerError::InvalidInput(format!(
                "account {} cannot carry a budget",
                input.account_code
            )));
        }
        Ok(())
    }
}
