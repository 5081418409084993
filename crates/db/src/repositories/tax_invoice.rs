//! Tax invoice repository.

use hoegye_core::LedgerError;
use hoegye_core::invoice::{TaxInvoice, manual_tax_invoice};
use hoegye_shared::LedgerConfig;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::info;

use super::error::{db_err, is_unique_violation};
use super::voucher::require_voucher;
use crate::entities::{journal_header, tax_invoice};

/// Tax invoice repository.
#[derive(Debug, Clone)]
pub struct TaxInvoiceRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl TaxInvoiceRepository {
    /// Creates a new tax invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Issues an invoice by hand for an approved sales or purchase voucher,
    /// typically one flagged after a failed linkage. Clears the flag.
    ///
    /// # Errors
    ///
    /// - `VoucherNotFound` for an unknown voucher
    /// - `InvoiceNotAllowed` if the voucher is not an approved sales/purchase voucher
    /// - `InvoiceAlreadyIssued` if the voucher has an invoice
    pub async fn issue_manual(
        &self,
        voucher_no: &str,
        supply_amount: Decimal,
    ) -> Result<TaxInvoice, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        set_manual_flag(&txn, voucher_no, false).await?;
        let voucher = require_voucher(&txn, voucher_no).await?;
        if find_for_voucher(&txn, voucher_no).await?.is_some() {
            return Err(LedgerError::InvoiceAlreadyIssued(voucher_no.to_string()));
        }

        let invoice = manual_tax_invoice(&voucher, supply_amount, &self.config)?;
        insert_invoice(&txn, &invoice).await?;

        txn.commit().await.map_err(db_err)?;

        info!(
            voucher_no,
            invoice_no = %invoice.invoice_no,
            supply = %invoice.supply_amount,
            tax = %invoice.tax_amount,
            "manual tax invoice issued"
        );
        Ok(invoice)
    }

    /// Returns the invoice linked to a voucher.
    ///
    /// # Errors
    ///
    /// `InvoiceNotFound` if the voucher has no invoice.
    pub async fn get_for_voucher(&self, voucher_no: &str) -> Result<TaxInvoice, LedgerError> {
        find_for_voucher(&self.db, voucher_no)
            .await?
            .ok_or_else(|| LedgerError::InvoiceNotFound(voucher_no.to_string()))
    }
}

/// Stores an issued invoice.
pub(crate) async fn insert_invoice<C: ConnectionTrait>(
    db: &C,
    invoice: &TaxInvoice,
) -> Result<(), LedgerError> {
    let model = tax_invoice::ActiveModel {
        invoice_no: Set(invoice.invoice_no.clone()),
        invoice_type: Set(invoice.invoice_type.into()),
        voucher_no: Set(invoice.voucher_no.clone()),
        supply_amount: Set(invoice.supply_amount),
        tax_amount: Set(invoice.tax_amount),
        total_amount: Set(invoice.total_amount),
        status: Set(invoice.status.into()),
        issue_date: Set(invoice.issue_date),
    };
    tax_invoice::Entity::insert(model)
        .exec_without_returning(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                LedgerError::InvoiceAlreadyIssued(invoice.voucher_no.clone())
            } else {
                db_err(e)
            }
        })?;
    Ok(())
}

/// Sets or clears the manual-invoice flag of a voucher.
pub(crate) async fn set_manual_flag<C: ConnectionTrait>(
    db: &C,
    voucher_no: &str,
    needs_manual_invoice: bool,
) -> Result<(), LedgerError> {
    journal_header::Entity::update_many()
        .set(journal_header::ActiveModel {
            needs_manual_invoice: Set(needs_manual_invoice),
            ..Default::default()
        })
        .filter(journal_header::Column::VoucherNo.eq(voucher_no))
        .exec(db)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn find_for_voucher<C: ConnectionTrait>(
    db: &C,
    voucher_no: &str,
) -> Result<Option<TaxInvoice>, LedgerError> {
    Ok(tax_invoice::Entity::find()
        .filter(tax_invoice::Column::VoucherNo.eq(voucher_no))
        .one(db)
        .await
        .map_err(db_err)?
        .map(|model| TaxInvoice {
            invoice_no: model.invoice_no,
            invoice_type: model.invoice_type.into(),
            voucher_no: model.voucher_no,
            supply_amount: model.supply_amount,
            tax_amount: model.tax_amount,
            total_amount: model.total_amount,
            status: model.status.into(),
            issue_date: model.issue_date,
        }))
}
