//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! They load state, call into `hoegye-core` for the rules and persist the
//! outcome, returning `LedgerError` throughout.

pub mod account;
pub mod budget;
pub mod closing;
pub mod dashboard;
mod error;
pub mod fixed_asset;
pub mod tax_invoice;
pub mod voucher;

pub use account::{AccountFilter, AccountRepository};
pub use budget::{BudgetFilter, BudgetReportLine, BudgetRepository};
pub use closing::{ClosingRepository, period_id};
pub use dashboard::{DashboardRepository, MonthlySummary, VoucherFilter};
pub use fixed_asset::FixedAssetRepository;
pub use tax_invoice::TaxInvoiceRepository;
pub use voucher::{ApprovalOutcome, InvoiceOutcome, VoucherRepository};
