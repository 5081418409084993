//! Tax invoices derived from sales and purchase vouchers.
//!
//! A tax invoice is tied 1:1 to the voucher it was derived from and carries
//! the same date and sequence in its number (`TI-YYYYMMDD-NNNN`).

pub mod linker;
pub mod types;

pub use linker::{compute_tax, invoice_no_for, link_tax_invoice, manual_tax_invoice, supply_amount};
pub use types::{InvoiceStatus, InvoiceType, TaxInvoice};
