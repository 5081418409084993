//! Per-type voucher templates.
//!
//! Each voucher type has one constructor producing a balanced line set.
//! Producers (sales, purchasing, payroll) describe the business event and the
//! template decides which side each account lands on.

use chrono::NaiveDate;
use hoegye_shared::LedgerConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{CreateVoucherInput, JournalLineInput, VoucherType};
use crate::error::LedgerError;
use crate::invoice::compute_tax;

/// A business event that expands into a voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VoucherTemplate {
    /// Cash in: debit cash, credit the source (receivable, revenue, ...).
    Receipt {
        /// Cash or bank account.
        cash_account: String,
        /// Account the money came from.
        source_account: String,
        /// Amount received.
        amount: Decimal,
    },
    /// Cash out: debit the target (expense, payable, ...), credit cash.
    Payment {
        /// Cash or bank account.
        cash_account: String,
        /// Account the money went to.
        target_account: String,
        /// Amount paid.
        amount: Decimal,
    },
    /// Non-cash move between two accounts.
    Transfer {
        /// Debited account.
        debit_account: String,
        /// Credited account.
        credit_account: String,
        /// Amount moved.
        amount: Decimal,
    },
    /// Sale on credit: debit receivable for supply plus VAT, credit revenue
    /// and VAT payable.
    Sales {
        /// Receivable account.
        receivable_account: String,
        /// Revenue account.
        revenue_account: String,
        /// VAT payable account.
        vat_account: String,
        /// Amount before VAT.
        supply_amount: Decimal,
    },
    /// Purchase on credit: debit expense and VAT receivable, credit payable.
    Purchase {
        /// Payable account.
        payable_account: String,
        /// Expense account.
        expense_account: String,
        /// VAT receivable account.
        vat_account: String,
        /// Amount before VAT.
        supply_amount: Decimal,
    },
}

impl VoucherTemplate {
    /// Receipt template.
    #[must_use]
    pub fn receipt(cash_account: impl Into<String>, source_account: impl Into<String>, amount: Decimal) -> Self {
        Self::Receipt {
            cash_account: cash_account.into(),
            source_account: source_account.into(),
            amount,
        }
    }

    /// Payment template.
    #[must_use]
    pub fn payment(cash_account: impl Into<String>, target_account: impl Into<String>, amount: Decimal) -> Self {
        Self::Payment {
            cash_account: cash_account.into(),
            target_account: target_account.into(),
            amount,
        }
    }

    /// Transfer template.
    #[must_use]
    pub fn transfer(debit_account: impl Into<String>, credit_account: impl Into<String>, amount: Decimal) -> Self {
        Self::Transfer {
            debit_account: debit_account.into(),
            credit_account: credit_account.into(),
            amount,
        }
    }

    /// Sales template.
    #[must_use]
    pub fn sales(
        receivable_account: impl Into<String>,
        revenue_account: impl Into<String>,
        vat_account: impl Into<String>,
        supply_amount: Decimal,
    ) -> Self {
        Self::Sales {
            receivable_account: receivable_account.into(),
            revenue_account: revenue_account.into(),
            vat_account: vat_account.into(),
            supply_amount,
        }
    }

    /// Purchase template.
    #[must_use]
    pub fn purchase(
        payable_account: impl Into<String>,
        expense_account: impl Into<String>,
        vat_account: impl Into<String>,
        supply_amount: Decimal,
    ) -> Self {
        Self::Purchase {
            payable_account: payable_account.into(),
            expense_account: expense_account.into(),
            vat_account: vat_account.into(),
            supply_amount,
        }
    }

    /// Voucher type the template produces.
    #[must_use]
    pub const fn voucher_type(&self) -> VoucherType {
        match self {
            Self::Receipt { .. } => VoucherType::Receipt,
            Self::Payment { .. } => VoucherType::Payment,
            Self::Transfer { .. } => VoucherType::Transfer,
            Self::Sales { .. } => VoucherType::Sales,
            Self::Purchase { .. } => VoucherType::Purchase,
        }
    }

    /// Expands the template into balanced lines.
    ///
    /// `cost_center` is applied to the revenue/expense side of the entry
    /// (the debit side for transfers).
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive amount.
    pub fn lines(
        &self,
        cost_center: Option<&str>,
        config: &LedgerConfig,
    ) -> Result<Vec<JournalLineInput>, LedgerError> {
        let cc = || cost_center.map(str::to_string);
        let lines = match self {
            Self::Receipt {
                cash_account,
                source_account,
                amount,
            } => {
                let amount = positive(*amount)?;
                vec![
                    JournalLineInput::debit(cash_account, amount),
                    JournalLineInput::credit(source_account, amount).with_cost_center(cc()),
                ]
            }
            Self::Payment {
                cash_account,
                target_account,
                amount,
            } => {
                let amount = positive(*amount)?;
                vec![
                    JournalLineInput::debit(target_account, amount).with_cost_center(cc()),
                    JournalLineInput::credit(cash_account, amount),
                ]
            }
            Self::Transfer {
                debit_account,
                credit_account,
                amount,
            } => {
                let amount = positive(*amount)?;
                vec![
                    JournalLineInput::debit(debit_account, amount).with_cost_center(cc()),
                    JournalLineInput::credit(credit_account, amount),
                ]
            }
            Self::Sales {
                receivable_account,
                revenue_account,
                vat_account,
                supply_amount,
            } => {
                let supply = positive(*supply_amount)?;
                let tax = compute_tax(supply, config);
                let mut lines = vec![
                    JournalLineInput::debit(receivable_account, supply + tax),
                    JournalLineInput::credit(revenue_account, supply).with_cost_center(cc()),
                ];
                if !tax.is_zero() {
                    lines.push(JournalLineInput::credit(vat_account, tax));
                }
                lines
            }
            Self::Purchase {
                payable_account,
                expense_account,
                vat_account,
                supply_amount,
            } => {
                let supply = positive(*supply_amount)?;
                let tax = compute_tax(supply, config);
                let mut lines =
                    vec![JournalLineInput::debit(expense_account, supply).with_cost_center(cc())];
                if !tax.is_zero() {
                    lines.push(JournalLineInput::debit(vat_account, tax));
                }
                lines.push(JournalLineInput::credit(payable_account, supply + tax));
                lines
            }
        };
        Ok(lines)
    }

    /// Builds a full creation request from the template.
    ///
    /// # Errors
    ///
    /// See [`VoucherTemplate::lines`].
    pub fn into_input(
        self,
        voucher_date: NaiveDate,
        created_by: impl Into<String>,
        description: Option<String>,
        cost_center: Option<&str>,
        config: &LedgerConfig,
    ) -> Result<CreateVoucherInput, LedgerError> {
        Ok(CreateVoucherInput {
            voucher_date,
            voucher_type: self.voucher_type(),
            lines: self.lines(cost_center, config)?,
            created_by: created_by.into(),
            description,
        })
    }
}

fn positive(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount > Decimal::ZERO {
        Ok(amount)
    } else {
        Err(LedgerError::InvalidInput(format!(
            "template amount must be positive, got {amount}"
        )))
    }
}
