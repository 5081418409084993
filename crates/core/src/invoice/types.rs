//! Tax invoice types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::VoucherType;

/// Tax invoice direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    /// Issued to a customer.
    Sales,
    /// Received from a supplier.
    Purchase,
}

impl InvoiceType {
    /// Invoice type for a voucher type, if that voucher type takes one.
    #[must_use]
    pub const fn for_voucher(voucher_type: VoucherType) -> Option<Self> {
        match voucher_type {
            VoucherType::Sales => Some(Self::Sales),
            VoucherType::Purchase => Some(Self::Purchase),
            VoucherType::Receipt | VoucherType::Payment | VoucherType::Transfer => None,
        }
    }

    /// Lowercase name as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Purchase => "purchase",
        }
    }
}

impl fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sales" => Ok(Self::Sales),
            "purchase" => Ok(Self::Purchase),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown invoice type '{other}'"
            ))),
        }
    }
}

/// Tax invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued alongside voucher approval.
    Issued,
}

impl InvoiceStatus {
    /// Lowercase name as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issued => "issued",
        }
    }
}

/// A tax invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInvoice {
    /// `TI-YYYYMMDD-NNNN`.
    pub invoice_no: String,
    /// Direction.
    pub invoice_type: InvoiceType,
    /// Voucher the invoice was derived from.
    pub voucher_no: String,
    /// Taxable amount.
    pub supply_amount: Decimal,
    /// VAT.
    pub tax_amount: Decimal,
    /// `supply_amount + tax_amount`.
    pub total_amount: Decimal,
    /// Status.
    pub status: InvoiceStatus,
    /// Issue date (the voucher date).
    pub issue_date: NaiveDate,
}
