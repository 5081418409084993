//! Core ledger logic for Hoegye.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; the `db`
//! crate loads state, calls into these modules and persists the outcome.
//!
//! # Modules
//!
//! - `account` - Chart of accounts and posting eligibility
//! - `ledger` - Journal vouchers, numbering, state machine, templates
//! - `invoice` - Tax invoices derived from sales/purchase vouchers
//! - `depreciation` - Fixed-asset depreciation schedules
//! - `budget` - Budget actuals and variance analysis
//! - `closing` - Accounting period gating and closing

pub mod account;
pub mod budget;
pub mod closing;
pub mod depreciation;
pub mod error;
pub mod invoice;
pub mod ledger;

pub use error::{ErrorKind, LedgerError};
