//! Derivation of tax invoices from approved vouchers.

use hoegye_shared::LedgerConfig;
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{InvoiceStatus, InvoiceType, TaxInvoice};
use crate::account::{AccountCatalog, AccountType};
use crate::error::LedgerError;
use crate::ledger::{Voucher, VoucherNo, VoucherStatus};

/// Prefix of tax invoice numbers.
pub const INVOICE_PREFIX: &str = "TI";

/// VAT on a supply amount, rounded half away from zero to the configured scale.
#[must_use]
pub fn compute_tax(supply_amount: Decimal, config: &LedgerConfig) -> Decimal {
    (supply_amount * config.vat_rate).round_dp_with_strategy(
        config.tax_rounding_scale,
        RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Invoice number mirroring a voucher number.
///
/// # Errors
///
/// `InvalidInput` when the voucher number is malformed.
pub fn invoice_no_for(voucher_no: &str) -> Result<String, LedgerError> {
    let parsed: VoucherNo = voucher_no.parse()?;
    Ok(parsed.with_prefix(INVOICE_PREFIX))
}

/// Supply amount of a sales or purchase voucher.
///
/// Sales take the net credit on revenue lines, purchases the net debit on
/// expense lines.
///
/// # Errors
///
/// - `InvoiceNotAllowed` for other voucher types
/// - `Linkage` when no qualifying line exists or the net amount is not positive
pub fn supply_amount(voucher: &Voucher, catalog: &AccountCatalog) -> Result<Decimal, LedgerError> {
    let invoice_type = invoice_type_of(voucher)?;
    let target = match invoice_type {
        InvoiceType::Sales => AccountType::Revenue,
        InvoiceType::Purchase => AccountType::Expense,
    };

    let mut matched = false;
    let mut supply = Decimal::ZERO;
    for line in &voucher.lines {
        if catalog.account_type(&line.account_code) == Some(target) {
            matched = true;
            supply += target
                .normal_balance()
                .calculate_balance_change(line.debit_amount, line.credit_amount);
        }
    }

    if !matched {
        return Err(LedgerError::Linkage {
            voucher_no: voucher.voucher_no.clone(),
            reason: format!("no {target} line"),
        });
    }
    if supply <= Decimal::ZERO {
        return Err(LedgerError::Linkage {
            voucher_no: voucher.voucher_no.clone(),
            reason: format!("net {target} amount {supply} is not positive"),
        });
    }
    Ok(supply)
}

/// Builds the tax invoice for a sales or purchase voucher on approval.
///
/// # Errors
///
/// See [`supply_amount`].
pub fn link_tax_invoice(
    voucher: &Voucher,
    catalog: &AccountCatalog,
    config: &LedgerConfig,
) -> Result<TaxInvoice, LedgerError> {
    let supply = supply_amount(voucher, catalog)?;
    build(voucher, invoice_type_of(voucher)?, supply, config)
}

/// Builds a tax invoice from a manually supplied amount, for approved
/// vouchers whose automatic linkage failed.
///
/// # Errors
///
/// - `InvoiceNotAllowed` if the voucher is not approved or not sales/purchase
/// - `InvalidInput` for a non-positive supply amount
pub fn manual_tax_invoice(
    voucher: &Voucher,
    supply: Decimal,
    config: &LedgerConfig,
) -> Result<TaxInvoice, LedgerError> {
    let invoice_type = invoice_type_of(voucher)?;
    if voucher.status != VoucherStatus::Approved {
        return Err(LedgerError::InvoiceNotAllowed {
            voucher_no: voucher.voucher_no.clone(),
            reason: format!("voucher is {}", voucher.status),
        });
    }
    if supply <= Decimal::ZERO {
        return Err(LedgerError::InvalidInput(
            "supply amount must be positive".into(),
        ));
    }
    build(voucher, invoice_type, supply, config)
}

fn invoice_type_of(voucher: &Voucher) -> Result<InvoiceType, LedgerError> {
    InvoiceType::for_voucher(voucher.voucher_type).ok_or_else(|| LedgerError::InvoiceNotAllowed {
        voucher_no: voucher.voucher_no.clone(),
        reason: format!("{} vouchers do not take tax invoices", voucher.voucher_type),
    })
}

fn build(
    voucher: &Voucher,
    invoice_type: InvoiceType,
    supply: Decimal,
    config: &LedgerConfig,
) -> Result<TaxInvoice, LedgerError> {
    let tax = compute_tax(supply, config);
    Ok(TaxInvoice {
        invoice_no: invoice_no_for(&voucher.voucher_no)?,
        invoice_type,
        voucher_no: voucher.voucher_no.clone(),
        supply_amount: supply,
        tax_amount: tax,
        total_amount: supply + tax,
        status: InvoiceStatus::Issued,
        issue_date: voucher.voucher_date,
    })
}
